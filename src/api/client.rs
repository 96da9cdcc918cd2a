use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::CommitApi;
use super::payload::{CommitSummary, ErrorBody, UserPayload};
use crate::credentials::Credential;
use crate::error::ApiError;
use crate::model::{Commit, RepoIdentity, User};
use crate::users::UserDirectory;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Substring of an error message that marks an exhausted request quota.
pub const RATE_LIMIT_MARKER: &str = "API rate limit exceeded";

/// Blocking client for the GitHub REST API.
///
/// Every request is authenticated with HTTP basic auth using the credential
/// handed in by the caller; the client itself holds no credential.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client rooted at `base_url` (e.g. [`DEFAULT_API_URL`]).
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let agent = HeaderValue::from_str(user_agent).map_err(|e| ApiError::Malformed {
            url: base_url.clone(),
            reason: format!("invalid user agent {user_agent:?}: {e}"),
        })?;
        headers.insert(USER_AGENT, agent);
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, repo: &RepoIdentity, page: u32) -> String {
        format!("{}/repos/{}/commits?page={}", self.base_url, repo, page)
    }

    pub fn commit_url(&self, repo: &RepoIdentity, sha: &str) -> String {
        format!("{}/repos/{}/commits/{}", self.base_url, repo, sha)
    }

    pub fn user_url(&self, login: &str) -> String {
        format!("{}/users/{}", self.base_url, login)
    }

    /// `GET /users/{login}`.
    pub fn fetch_user(&self, login: &str, credential: &Credential) -> Result<User, ApiError> {
        let payload: UserPayload = self.get_json(&self.user_url(login), credential)?;
        Ok(User::new(payload.id, payload.login, payload.name))
    }

    /// Issue an authenticated GET and decode the body as `T`.
    pub(super) fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        debug!(%url, principal = %credential.principal, "GET");
        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self
            .http
            .get(url)
            .basic_auth(&credential.principal, Some(&credential.secret))
            .send()
            .map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport)?;
        decode_response(url, status, &body)
    }
}

impl CommitApi for GitHubClient {
    fn fetch_page(
        &self,
        repo: &RepoIdentity,
        page: u32,
        credential: &Credential,
    ) -> Result<Vec<CommitSummary>, ApiError> {
        let summaries: Vec<CommitSummary> =
            self.get_json(&self.page_url(repo, page), credential)?;
        info!(repository = %repo, page, commits = summaries.len(), "fetched commit page");
        Ok(summaries)
    }

    fn fetch_commit(
        &self,
        repo: &RepoIdentity,
        sha: &str,
        credential: &Credential,
        users: &UserDirectory,
    ) -> Result<Commit, ApiError> {
        super::detail::resolve_commit(self, repo, sha, credential, users)
    }
}

/// Turn a raw response into `T` or a typed error.
///
/// A JSON object carrying both `message` and `documentation_url` is an API
/// error regardless of status. Anything that is not JSON, or not shaped like
/// `T`, is malformed.
pub(super) fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: u16,
    body: &str,
) -> Result<T, ApiError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if status == 404 => return Err(ApiError::NotFound { url: url.into() }),
        Err(e) => {
            return Err(ApiError::Malformed {
                url: url.into(),
                reason: format!("status {status}: {e}"),
            });
        }
    };

    if value.is_object()
        && let Ok(err) = serde_json::from_value::<ErrorBody>(value.clone())
    {
        return Err(classify_error(url, status, err));
    }
    if status == 404 {
        return Err(ApiError::NotFound { url: url.into() });
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Rejected {
            url: url.into(),
            status,
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Malformed {
        url: url.into(),
        reason: e.to_string(),
    })
}

fn classify_error(url: &str, status: u16, err: ErrorBody) -> ApiError {
    let url = url.to_string();
    if err.message.contains(RATE_LIMIT_MARKER) {
        return ApiError::RateLimited {
            url,
            message: err.message,
        };
    }
    let message = format!("{}. Documentation: {}", err.message, err.documentation_url);
    match status {
        404 => ApiError::NotFound { url },
        401 | 403 => ApiError::Auth {
            url,
            status,
            message,
        },
        _ => ApiError::Rejected {
            url,
            status,
            message,
        },
    }
}
