use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

/// A principal/secret pair used to authenticate one request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub principal: String,
    pub secret: String,
}

impl Credential {
    pub fn new(principal: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            secret: secret.into(),
        }
    }
}

// Keep secrets out of logs and error output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &self.principal)
            .field("secret", &"***")
            .finish()
    }
}

/// Hands out credentials in order until all of them have been used.
///
/// States are `Active(i)` while `cursor < len` and `Exhausted` afterwards.
/// The rotator never wraps on its own: [`reset`](Self::reset) is the only way
/// back from `Exhausted`. One rotator belongs to one ingestion run.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    cursor: usize,
}

impl CredentialRotator {
    pub fn new(credentials: Vec<Credential>) -> Result<Self, ConfigError> {
        if credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        Ok(Self {
            credentials,
            cursor: 0,
        })
    }

    /// Return the credential at the cursor and advance, or `None` once exhausted.
    pub fn next_credential(&mut self) -> Option<Credential> {
        let credential = self.credentials.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(credential)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.credentials.len()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

/// Read a credential file where each non-blank line is `username:token`.
///
/// Whitespace around the colon is allowed:
/// ```text
/// octocat:ghp_a1b2c3
/// octocat : ghp_d4e5f6
/// ```
///
/// # Errors
/// - [`ConfigError::Read`] if the file cannot be read.
/// - [`ConfigError::InvalidCredential`] for a line without exactly one colon
///   or with an empty side; the 1-based line number is reported.
pub fn read_credentials(path: &Path) -> Result<Vec<Credential>, ConfigError> {
    let text = read_text(path)?;
    let mut out = Vec::new();
    for (line, raw) in non_blank_lines(&text) {
        let mut parts = raw.split(':');
        let cred = match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(token), None) => Credential::new(user.trim(), token.trim()),
            _ => return Err(invalid(path, line)),
        };
        if cred.principal.is_empty() || cred.secret.is_empty() {
            return Err(invalid(path, line));
        }
        out.push(cred);
    }
    debug!(count = out.len(), path = %path.display(), "loaded credentials");
    Ok(out)
}

/// Read a token file (one token per non-blank line) for a single username.
pub fn read_tokens(path: &Path, username: &str) -> Result<Vec<Credential>, ConfigError> {
    let text = read_text(path)?;
    let out: Vec<Credential> = non_blank_lines(&text)
        .map(|(_, token)| Credential::new(username, token))
        .collect();
    debug!(count = out.len(), path = %path.display(), "loaded tokens");
    Ok(out)
}

fn read_text(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Trimmed non-blank lines paired with their 1-based line number.
fn non_blank_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn invalid(path: &Path, line: usize) -> ConfigError {
    ConfigError::InvalidCredential {
        path: path.to_path_buf(),
        line,
    }
}
