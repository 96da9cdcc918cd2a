//! Ingestion pipeline: pages, commit details and credential rotation folded
//! into one lazy stream of commits.
//!
//! The stream is an explicit state machine:
//!
//! ```text
//!           fetch_page(n) ok, non-empty
//!   Page(n) ───────────────────────────▶ Commits(n, shas, i)
//!     │  ▲                                   │  │
//!     │  └──── i == shas.len(), n += 1 ──────┘  │ fetch_commit(shas[i]) ok: emit, i += 1
//!     │ empty page                              │
//!     ▼                                         ▼
//!   Finished ◀──────────── fatal error ─────── (any)
//! ```
//!
//! A rate-limited request leaves the state untouched and swaps the
//! credential, so the very same page or commit is requested again. When the
//! rotator is exhausted the stream either waits for the cool-down and starts
//! over from the first credential, or fails.

use std::time::Duration;

use tracing::{info, warn};

use crate::api::CommitApi;
use crate::cancel::CancelToken;
use crate::credentials::{Credential, CredentialRotator};
use crate::error::{ApiError, ConfigError, Error};
use crate::model::{Commit, RepoIdentity};
use crate::users::UserDirectory;

/// Published quota window of the API (one hour) plus a small margin.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3602);

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Wait for the cool-down when every credential is rate limited,
    /// instead of failing.
    pub can_wait: bool,
    pub cooldown: Duration,
    pub cancel: CancelToken,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            can_wait: false,
            cooldown: DEFAULT_COOLDOWN,
            cancel: CancelToken::new(),
        }
    }
}

#[derive(Debug)]
enum Stage {
    Page,
    Commits { shas: Vec<String>, next: usize },
    Finished,
}

/// What one step of the state machine produced.
enum Step {
    Emit(Commit),
    Continue,
}

/// Lazy stream of fully resolved commits, newest first.
///
/// Yields `Err` at most once; the stream is finished afterwards. It cannot be
/// resumed: start a new one with [`fetch_commits`] to retry.
pub struct CommitStream<'a, A: CommitApi> {
    api: &'a A,
    users: &'a UserDirectory,
    repo: RepoIdentity,
    rotator: CredentialRotator,
    credential: Credential,
    options: FetchOptions,
    page: u32,
    stage: Stage,
}

/// Start streaming every commit of `repo`.
///
/// Takes the first credential from `rotator` right away. `users` is shared
/// with the caller so that resolved authors survive this run.
pub fn fetch_commits<'a, A: CommitApi>(
    api: &'a A,
    users: &'a UserDirectory,
    repo: RepoIdentity,
    mut rotator: CredentialRotator,
    options: FetchOptions,
) -> Result<CommitStream<'a, A>, Error> {
    let credential = rotator
        .next_credential()
        .ok_or(ConfigError::NoCredentials)?;
    Ok(CommitStream {
        api,
        users,
        repo,
        rotator,
        credential,
        options,
        page: 1,
        stage: Stage::Page,
    })
}

impl<A: CommitApi> CommitStream<'_, A> {
    /// Page currently being processed (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn repository(&self) -> &RepoIdentity {
        &self.repo
    }

    fn step(&mut self) -> Result<Step, Error> {
        match &mut self.stage {
            Stage::Finished => Ok(Step::Continue),
            Stage::Page => {
                match self.api.fetch_page(&self.repo, self.page, &self.credential) {
                    Ok(summaries) if summaries.is_empty() => {
                        info!(repository = %self.repo, pages = self.page - 1, "no more commits");
                        self.stage = Stage::Finished;
                    }
                    Ok(summaries) => {
                        self.stage = Stage::Commits {
                            shas: summaries.into_iter().map(|s| s.sha).collect(),
                            next: 0,
                        };
                    }
                    Err(e) => {
                        let step = format!("page {} of {}", self.page, self.repo);
                        self.recover(e, step)?;
                    }
                }
                Ok(Step::Continue)
            }
            Stage::Commits { shas, next } => {
                let Some(sha) = shas.get(*next).cloned() else {
                    self.page += 1;
                    self.stage = Stage::Page;
                    return Ok(Step::Continue);
                };
                match self
                    .api
                    .fetch_commit(&self.repo, &sha, &self.credential, self.users)
                {
                    Ok(commit) => {
                        *next += 1;
                        Ok(Step::Emit(commit))
                    }
                    Err(e) => {
                        let step = format!("commit {} of {}", sha, self.repo);
                        self.recover(e, step)?;
                        Ok(Step::Continue)
                    }
                }
            }
        }
    }

    /// Decide whether a failed request can be retried.
    ///
    /// Only a rate limit is recoverable: by the next credential, or by the
    /// cool-down when allowed. The current stage is left as is either way.
    fn recover(&mut self, err: ApiError, step: String) -> Result<(), Error> {
        if !matches!(err, ApiError::RateLimited { .. }) {
            return Err(Error::Step { step, source: err });
        }
        if let Some(next) = self.rotator.next_credential() {
            warn!(%step, principal = %next.principal, "rate limited, switching credential");
            self.credential = next;
            return Ok(());
        }
        if !self.options.can_wait {
            return Err(Error::Step { step, source: err });
        }

        warn!(
            %step,
            cooldown_secs = self.options.cooldown.as_secs(),
            "all credentials rate limited, waiting for quota reset"
        );
        if self.options.cancel.wait_timeout(self.options.cooldown) {
            return Err(Error::Cancelled);
        }
        self.rotator.reset();
        self.credential = self
            .rotator
            .next_credential()
            .ok_or(ConfigError::NoCredentials)?;
        Ok(())
    }
}

impl<A: CommitApi> Iterator for CommitStream<'_, A> {
    type Item = Result<Commit, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if matches!(self.stage, Stage::Finished) {
                return None;
            }
            if self.options.cancel.is_cancelled() {
                self.stage = Stage::Finished;
                return Some(Err(Error::Cancelled));
            }
            match self.step() {
                Ok(Step::Emit(commit)) => return Some(Ok(commit)),
                Ok(Step::Continue) => continue,
                Err(e) => {
                    self.stage = Stage::Finished;
                    return Some(Err(e));
                }
            }
        }
    }
}
