//! Hosting-service API layer.
//!
//! [`CommitApi`] is the seam between the ingestion pipeline and the network:
//! the pipeline only ever talks to this trait, and [`GitHubClient`] is the
//! production implementation backed by `reqwest`'s blocking client.
//!
//! Implementations never retry. Every failure comes back as an
//! [`ApiError`](crate::error::ApiError) carrying the request URL, and the
//! pipeline decides what to do with it.

mod client;
mod detail;
mod payload;

use crate::credentials::Credential;
use crate::error::ApiError;
use crate::model::{Commit, RepoIdentity};
use crate::users::UserDirectory;

pub use client::{DEFAULT_API_URL, GitHubClient, RATE_LIMIT_MARKER};
pub use payload::CommitSummary;

/// The two requests the ingestion pipeline needs.
pub trait CommitApi {
    /// Fetch page `page` (1-based) of the repository's commit list.
    /// An empty page means there are no more commits.
    fn fetch_page(
        &self,
        repo: &RepoIdentity,
        page: u32,
        credential: &Credential,
    ) -> Result<Vec<CommitSummary>, ApiError>;

    /// Fetch and fully resolve one commit, enriching its author through `users`.
    fn fetch_commit(
        &self,
        repo: &RepoIdentity,
        sha: &str,
        credential: &Credential,
        users: &UserDirectory,
    ) -> Result<Commit, ApiError>;
}
