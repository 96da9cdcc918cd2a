//! Value records produced by the ingestion pipeline.
//!
//! All three types are plain data: they hold no back-references and can be
//! cloned, compared and persisted freely.

mod commit;
mod repo_identity;
mod user;

pub use commit::{Commit, MOMENT_FORMAT, format_moment, parse_moment};
pub use repo_identity::RepoIdentity;
pub use user::User;
