use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::client::GitHubClient;
use super::payload::{AccountRef, CommitDetail};
use crate::credentials::Credential;
use crate::error::ApiError;
use crate::model::{Commit, RepoIdentity, User};
use crate::users::UserDirectory;

/// Fetch one commit's detail and turn it into a [`Commit`].
///
/// The author is taken from the `author` account, or from `committer` when the
/// author is not linked to an account. A user that is not cached yet is looked
/// up once and registered. A 404 on that lookup degrades to a partial user
/// built from the commit payload (no display name), which is **not** cached so
/// that a later commit can still resolve the full record.
///
/// # Errors
/// Any request failure other than the author 404 is returned unchanged.
pub(super) fn resolve_commit(
    client: &GitHubClient,
    repo: &RepoIdentity,
    sha: &str,
    credential: &Credential,
    users: &UserDirectory,
) -> Result<Commit, ApiError> {
    let url = client.commit_url(repo, sha);
    let detail: CommitDetail = client.get_json(&url, credential)?;

    if detail.sha.is_empty() {
        return Err(ApiError::Malformed {
            url,
            reason: "empty sha".into(),
        });
    }
    let moment = parse_api_moment(&detail.commit.author.date).map_err(|reason| {
        ApiError::Malformed {
            url: url.clone(),
            reason,
        }
    })?;
    let repository = detail
        .url
        .as_deref()
        .and_then(repo_from_commit_url)
        .unwrap_or_else(|| repo.clone());

    let author = match detail.author.or(detail.committer) {
        Some(account) => Some(resolve_author(client, account, credential, users)?),
        None => None,
    };

    Ok(Commit {
        sha: detail.sha,
        message: detail.commit.message,
        repository,
        moment,
        author,
        files: detail.files.into_iter().map(|f| f.filename.into()).collect(),
    })
}

fn resolve_author(
    client: &GitHubClient,
    account: AccountRef,
    credential: &Credential,
    users: &UserDirectory,
) -> Result<User, ApiError> {
    if let Some(user) = users.lookup(&account.login) {
        return Ok(user);
    }
    match client.fetch_user(&account.login, credential) {
        Ok(user) => {
            if users.register(user.clone()) {
                debug!(login = %user.login, "registered user");
                Ok(user)
            } else {
                Ok(users.lookup(&user.login).unwrap_or(user))
            }
        }
        Err(ApiError::NotFound { url }) => {
            info!(login = %account.login, %url, "user not found, keeping partial author");
            Ok(User::new(account.id, account.login, None))
        }
        Err(e) => Err(e),
    }
}

/// Parse an RFC 3339 timestamp and drop sub-second precision.
fn parse_api_moment(text: &str) -> Result<DateTime<Utc>, String> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .map_err(|e| format!("invalid date {text:?}: {e}"))?;
    DateTime::from_timestamp(parsed.timestamp(), 0)
        .ok_or_else(|| format!("date out of range: {text:?}"))
}

/// Extract `owner/name` from `…/repos/{owner}/{name}/commits/{sha}`.
fn repo_from_commit_url(url: &str) -> Option<RepoIdentity> {
    let (_, rest) = url.split_once("/repos/")?;
    let (full_name, _) = rest.split_once("/commits/")?;
    RepoIdentity::parse(full_name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CommitApi;
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use std::path::PathBuf;

    fn cred() -> Credential {
        Credential::new("alice", "t1")
    }

    fn repo() -> RepoIdentity {
        RepoIdentity::new("octocat", "Hello-World")
    }

    fn detail_body(sha: &str, author: Value, committer: Value) -> Value {
        json!({
            "sha": sha,
            "url": format!("https://api.github.com/repos/octocat/Hello-World/commits/{sha}"),
            "commit": {
                "message": "Fix all the bugs\n\nÜnïcödé body",
                "author": { "name": "Monalisa", "date": "2011-04-14T16:00:49Z" }
            },
            "author": author,
            "committer": committer,
            "files": [
                { "filename": "src/b.rs" },
                { "filename": "README.md" },
                { "filename": "src/b.rs" }
            ]
        })
    }

    fn mock_detail(server: &MockServer, sha: &str, body: Value) {
        server.mock(|when, then| {
            when.method(GET)
                .path(format!("/repos/octocat/Hello-World/commits/{sha}"));
            then.status(200).json_body(body);
        });
    }

    #[test]
    fn resolves_commit_with_author_lookup_and_caches_it() {
        let server = MockServer::start();
        mock_detail(
            &server,
            "abc",
            detail_body("abc", json!({ "id": 1, "login": "octocat" }), Value::Null),
        );
        mock_detail(
            &server,
            "def",
            detail_body("def", json!({ "id": 1, "login": "octocat" }), Value::Null),
        );
        let user = server.mock(|when, then| {
            when.method(GET).path("/users/octocat");
            then.status(200)
                .json_body(json!({ "id": 1, "login": "octocat", "name": "The Octocat" }));
        });

        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let users = UserDirectory::new();

        let c = client.fetch_commit(&repo(), "abc", &cred(), &users).unwrap();
        assert_eq!(c.sha, "abc");
        assert_eq!(c.message, "Fix all the bugs\n\nÜnïcödé body");
        assert_eq!(c.repository, repo());
        assert_eq!(c.moment, Utc.with_ymd_and_hms(2011, 4, 14, 16, 0, 49).unwrap());
        assert_eq!(
            c.files,
            vec![
                PathBuf::from("src/b.rs"),
                PathBuf::from("README.md"),
                PathBuf::from("src/b.rs")
            ]
        );
        let author = c.author.unwrap();
        assert_eq!(author.name.as_deref(), Some("The Octocat"));

        client.fetch_commit(&repo(), "def", &cred(), &users).unwrap();
        user.assert_hits(1);
        assert!(users.lookup("octocat").is_some());
    }

    #[test]
    fn falls_back_to_committer_then_to_no_author() {
        let server = MockServer::start();
        mock_detail(
            &server,
            "c1",
            detail_body("c1", Value::Null, json!({ "id": 9, "login": "hubot" })),
        );
        mock_detail(&server, "c2", detail_body("c2", Value::Null, Value::Null));
        server.mock(|when, then| {
            when.method(GET).path("/users/hubot");
            then.status(200)
                .json_body(json!({ "id": 9, "login": "hubot", "name": null }));
        });

        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let users = UserDirectory::new();

        let c1 = client.fetch_commit(&repo(), "c1", &cred(), &users).unwrap();
        assert_eq!(c1.author.unwrap().login, "hubot");

        let c2 = client.fetch_commit(&repo(), "c2", &cred(), &users).unwrap();
        assert!(c2.author.is_none());
    }

    #[test]
    fn missing_user_degrades_and_is_not_cached() {
        let server = MockServer::start();
        mock_detail(
            &server,
            "g1",
            detail_body("g1", json!({ "id": 42, "login": "ghost" }), Value::Null),
        );
        mock_detail(
            &server,
            "g2",
            detail_body("g2", json!({ "id": 42, "login": "ghost" }), Value::Null),
        );
        let lookup = server.mock(|when, then| {
            when.method(GET).path("/users/ghost");
            then.status(404).json_body(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            }));
        });

        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let users = UserDirectory::new();

        for sha in ["g1", "g2"] {
            let c = client.fetch_commit(&repo(), sha, &cred(), &users).unwrap();
            let author = c.author.unwrap();
            assert_eq!(author.id, 42);
            assert_eq!(author.login, "ghost");
            assert!(author.name.is_none());
        }
        assert!(users.lookup("ghost").is_none());
        lookup.assert_hits(2);
    }

    #[test]
    fn user_lookup_rate_limit_propagates() {
        let server = MockServer::start();
        mock_detail(
            &server,
            "r1",
            detail_body("r1", json!({ "id": 1, "login": "octocat" }), Value::Null),
        );
        server.mock(|when, then| {
            when.method(GET).path("/users/octocat");
            then.status(403).json_body(json!({
                "message": "API rate limit exceeded for 1.2.3.4.",
                "documentation_url": "https://docs.github.com/rest"
            }));
        });

        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let err = client
            .fetch_commit(&repo(), "r1", &cred(), &UserDirectory::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { .. }));
    }

    #[test]
    fn missing_commit_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/octocat/Hello-World/commits/nope");
            then.status(404).json_body(json!({
                "message": "No commit found for SHA: nope",
                "documentation_url": "https://docs.github.com/rest"
            }));
        });
        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let err = client
            .fetch_commit(&repo(), "nope", &cred(), &UserDirectory::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert!(err.url().ends_with("/commits/nope"));
    }

    #[test]
    fn bad_date_is_malformed() {
        let server = MockServer::start();
        let mut body = detail_body("d1", Value::Null, Value::Null);
        body["commit"]["author"]["date"] = json!("yesterday");
        mock_detail(&server, "d1", body);
        let client = GitHubClient::new(&server.base_url(), "t").unwrap();
        let err = client
            .fetch_commit(&repo(), "d1", &cred(), &UserDirectory::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    #[test]
    fn api_moment_is_truncated_to_seconds_in_utc() {
        let m = parse_api_moment("2011-04-14T18:00:49.750+02:00").unwrap();
        assert_eq!(m, Utc.with_ymd_and_hms(2011, 4, 14, 16, 0, 49).unwrap());
    }

    #[test]
    fn repo_is_read_from_detail_url() {
        assert_eq!(
            repo_from_commit_url("https://api.github.com/repos/a/b/commits/123"),
            Some(RepoIdentity::new("a", "b"))
        );
        assert_eq!(repo_from_commit_url("https://api.github.com/x"), None);
    }
}
