use serde::Deserialize;

/// One entry of a commit list page. Only the hash is needed to go on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `GET /repos/{owner}/{name}/commits/{sha}`.
#[derive(Debug, Deserialize)]
pub(super) struct CommitDetail {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
    pub commit: GitCommit,
    #[serde(default)]
    pub author: Option<AccountRef>,
    #[serde(default)]
    pub committer: Option<AccountRef>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitCommit {
    pub message: String,
    pub author: GitSignature,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitSignature {
    pub date: String,
}

/// Account linked to a commit's author or committer.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct AccountRef {
    #[serde(default)]
    pub id: u64,
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct FileEntry {
    pub filename: String,
}

/// Body of `GET /users/{login}`.
#[derive(Debug, Deserialize)]
pub(super) struct UserPayload {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Logical error body: both keys present means "this is not data".
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: String,
    pub documentation_url: String,
}
