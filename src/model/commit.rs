use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RepoIdentity, User};

/// Canonical text form of a commit moment, second precision, always UTC.
pub const MOMENT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A fully resolved commit.
///
/// `files` keeps the order of the detail payload, duplicates included.
/// `author` is `None` when neither the author nor the committer of the commit
/// is linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub repository: RepoIdentity,
    #[serde(with = "moment_text")]
    pub moment: DateTime<Utc>,
    pub author: Option<User>,
    pub files: Vec<PathBuf>,
}

impl Commit {
    pub fn moment_text(&self) -> String {
        format_moment(&self.moment)
    }
}

pub fn format_moment(moment: &DateTime<Utc>) -> String {
    moment.format(MOMENT_FORMAT).to_string()
}

/// Parse a moment in [`MOMENT_FORMAT`].
pub fn parse_moment(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, MOMENT_FORMAT).map(|naive| naive.and_utc())
}

mod moment_text {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(moment: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_moment(moment))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(d)?;
        super::parse_moment(&text)
            .map_err(|e| D::Error::custom(format!("invalid moment {text:?}: {e}")))
    }
}
