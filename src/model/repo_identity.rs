use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::error::FormatError;

const SEPARATOR: char = '/';

/// Owner and name of a hosted repository, e.g. `octocat/Hello-World`.
///
/// Serialized as its full name. An owner or name containing `/` has no
/// unambiguous full name and fails to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RepoIdentity {
    pub owner: String,
    pub name: String,
}

impl RepoIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `<owner>/<name>`.
    ///
    /// Exactly one `/` is required. Empty segments are accepted (`"/x"`
    /// yields an empty owner) so that names written by older tools keep
    /// parsing.
    pub fn parse(full_name: &str) -> Result<Self, FormatError> {
        let mut parts = full_name.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => Ok(Self::new(owner, name)),
            _ => Err(FormatError {
                full_name: full_name.to_string(),
            }),
        }
    }

    /// Join owner and name with `separator`.
    ///
    /// `full_name_with("/")` is the canonical full name; `"_"` gives a
    /// file-name friendly slug.
    pub fn full_name_with(&self, separator: &str) -> String {
        format!("{}{}{}", self.owner, separator, self.name)
    }

    pub fn full_name(&self) -> String {
        self.full_name_with("/")
    }

    /// Whether [`full_name`](Self::full_name) parses back to `self`.
    pub fn is_well_formed(&self) -> bool {
        !self.owner.contains(SEPARATOR) && !self.name.contains(SEPARATOR)
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner, SEPARATOR, self.name)
    }
}

impl FromStr for RepoIdentity {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoIdentity {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for RepoIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_well_formed() {
            return Err(S::Error::custom(format!(
                "owner and name must not contain '{SEPARATOR}': {self:?}"
            )));
        }
        serializer.serialize_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let id = RepoIdentity::parse("octocat/Hello-World").unwrap();
        assert_eq!(id.owner, "octocat");
        assert_eq!(id.name, "Hello-World");
        assert_eq!(id, RepoIdentity::new("octocat", "Hello-World"));
    }

    #[test]
    fn formats_with_default_and_custom_separator() {
        let id = RepoIdentity::new("octocat", "Hello-World");
        assert_eq!(id.full_name(), "octocat/Hello-World");
        assert_eq!(id.to_string(), "octocat/Hello-World");
        assert_eq!(id.full_name_with("_"), "octocat_Hello-World");
    }

    #[test]
    fn rejects_missing_separator() {
        let err = RepoIdentity::parse("bad-name").unwrap_err();
        assert_eq!(err.full_name, "bad-name");
    }

    #[test]
    fn rejects_extra_separator() {
        assert!(RepoIdentity::parse("a/b/c").is_err());
        assert!("a/b/".parse::<RepoIdentity>().is_err());
    }

    #[test]
    fn keeps_empty_segments() {
        let id = RepoIdentity::parse("/name").unwrap();
        assert_eq!(id.owner, "");
        assert_eq!(id.name, "name");
        assert_eq!(id.full_name(), "/name");
    }

    #[test]
    fn serializes_as_full_name() {
        let id = RepoIdentity::new("o", "n");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"o/n\"");
        let back: RepoIdentity = serde_json::from_str("\"o/n\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<RepoIdentity>("\"on\"").is_err());
    }

    #[test]
    fn separator_inside_a_segment_does_not_serialize() {
        let id = RepoIdentity::new("a/b", "c");
        assert!(!id.is_well_formed());
        let err = serde_json::to_string(&id).unwrap_err();
        assert!(err.to_string().contains("must not contain '/'"));
        assert!(serde_json::to_string(&RepoIdentity::new("a", "b/c")).is_err());
        assert!(RepoIdentity::new("", "odd").is_well_formed());
    }
}
