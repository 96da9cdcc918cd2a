//! Error taxonomy for commitfetch.
//!
//! Lower components fail outright with one of the typed errors below; only the
//! ingestion pipeline inspects them to decide on a retry.
use std::path::PathBuf;

use thiserror::Error;

/// Umbrella error returned by the public operations of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The failing request was part of a pipeline step.
    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: ApiError,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns the underlying API error, if any, looking through step context.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) | Error::Step { source: e, .. } => Some(e),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.api_error(), Some(ApiError::RateLimited { .. }))
    }
}

/// A repository full name that is not `<owner>/<name>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("repository name must be in the format <owner>/<name>: {full_name:?}")]
pub struct FormatError {
    pub full_name: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("at least one credential must be provided")]
    NoCredentials,

    #[error("invalid credential on line {line} of {}", path.display())]
    InvalidCredential { path: PathBuf, line: usize },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("HOME is not set and XDG_CONFIG_HOME is empty")]
    NoHome,
}

/// Failure of a single request against the hosting API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("rate limit exceeded at {url}: {message}")]
    RateLimited { url: String, message: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("authentication rejected ({status}) at {url}: {message}")]
    Auth {
        url: String,
        status: u16,
        message: String,
    },

    #[error("request rejected ({status}) at {url}: {message}")]
    Rejected {
        url: String,
        status: u16,
        message: String,
    },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn url(&self) -> &str {
        match self {
            ApiError::RateLimited { url, .. }
            | ApiError::NotFound { url }
            | ApiError::Auth { url, .. }
            | ApiError::Rejected { url, .. }
            | ApiError::Malformed { url, .. }
            | ApiError::Transport { url, .. } => url,
        }
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: invalid commit record: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to encode commit {sha}: {source}")]
    Encode {
        sha: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
