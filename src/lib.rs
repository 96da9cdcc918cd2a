//! Crate entry point for **commitfetch**.
//!
//! commitfetch retrieves the full commit history of a GitHub repository
//! through the paginated, rate-limited REST API, resolves each commit into a
//! [`Commit`] record, and checkpoints those records to a line-oriented file.
//!
//! The moving parts, leaves first:
//! - [`RepoIdentity`], [`User`], [`Commit`]: plain value records.
//! - [`UserDirectory`]: cache of resolved users shared across runs.
//! - [`CredentialRotator`]: hands out credentials until exhausted.
//! - [`GitHubClient`]: page fetcher and commit detail resolver behind the
//!   [`CommitApi`] trait.
//! - [`fetch_commits`]: the ingestion pipeline, a lazy [`CommitStream`].
//! - [`codec`]: persistence of commits, one record per line.
//!
//! ```no_run
//! use commitfetch::{
//!     Credential, CredentialRotator, FetchOptions, GitHubClient, RepoIdentity,
//!     UserDirectory, DEFAULT_API_URL, fetch_commits,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(DEFAULT_API_URL, "my-tool")?;
//! let users = UserDirectory::new();
//! let rotator = CredentialRotator::new(vec![Credential::new("octocat", "ghp_...")])?;
//! let repo = RepoIdentity::parse("octocat/Hello-World")?;
//!
//! let commits = fetch_commits(&client, &users, repo, rotator, FetchOptions::default())?;
//! commitfetch::codec::write_commits(
//!     "octocat_Hello-World_commits.txt",
//!     commits.collect::<Result<Vec<_>, _>>()?,
//! )?;
//! # Ok(())
//! # }
//! ```

mod api;
mod cancel;
pub mod cli;
pub mod codec;
mod config;
mod credentials;
mod error;
mod model;
mod paths;
mod pipeline;
mod progress;
mod users;

pub use api::{CommitApi, CommitSummary, DEFAULT_API_URL, GitHubClient, RATE_LIMIT_MARKER};
pub use cancel::CancelToken;
pub use config::{Config, load_config, load_config_from};
pub use credentials::{Credential, CredentialRotator, read_credentials, read_tokens};
pub use error::{ApiError, CodecError, ConfigError, Error, FormatError, Result};
pub use model::{Commit, MOMENT_FORMAT, RepoIdentity, User, format_moment, parse_moment};
pub use paths::commitfetch_home;
pub use pipeline::{CommitStream, DEFAULT_COOLDOWN, FetchOptions, fetch_commits};
pub use users::UserDirectory;
