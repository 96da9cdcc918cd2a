use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;

use crate::api::GitHubClient;
use crate::cancel::CancelToken;
use crate::codec::CommitWriter;
use crate::config::{Config, load_config};
use crate::credentials::{Credential, CredentialRotator, read_credentials, read_tokens};
use crate::model::RepoIdentity;
use crate::pipeline::{FetchOptions, fetch_commits};
use crate::progress::{fetch_spinner, finish_stopped, finish_written};
use crate::users::UserDirectory;

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Repository in the form <owner>/<name>
    #[arg(short, long)]
    pub repository: RepoIdentity,

    /// File listing `username:token` credentials, one per line
    #[arg(short, long, conflicts_with_all = ["username", "token_file"])]
    pub credentials: Option<PathBuf>,

    /// Username owning the tokens of --token-file
    #[arg(short, long, requires = "token_file")]
    pub username: Option<String>,

    /// File listing tokens owned by --username, one per line
    #[arg(short, long, requires = "username")]
    pub token_file: Option<PathBuf>,

    /// Wait for the quota reset when every credential is rate limited
    #[arg(short = 'w', long)]
    pub can_wait: bool,

    /// Output file [default: <owner>_<name>_commits.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override the cool-down after all credentials are rate limited
    #[arg(long)]
    pub cooldown_secs: Option<u64>,
}

impl FetchArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}_commits.txt", self.repository.full_name_with("_")))
        })
    }
}

/// CLI command: fetch every commit of a repository into a commit file.
///
/// Process:
/// 1. Load `config.toml` (defaults if absent) and the credentials.
/// 2. Stream commits through the ingestion pipeline, appending each one to
///    the output as it arrives. Ctrl-C cancels the stream, including a
///    cool-down wait.
/// 3. Move the output into place, even if the stream failed or was cancelled
///    midway, so the commits already fetched are kept; the failure is
///    reported afterwards.
pub fn cmd_fetch(args: FetchArgs) -> Result<()> {
    let cfg = load_config()?;
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .context("failed to install the Ctrl-C handler")?;
    fetch_to_file(&args, &cfg, cancel)?;
    Ok(())
}

/// Run a fetch with an already loaded config, stopping early once `cancel`
/// fires. Returns the number of commits written.
pub fn fetch_to_file(args: &FetchArgs, cfg: &Config, cancel: CancelToken) -> Result<usize> {
    let rotator = CredentialRotator::new(load_credentials(args, cfg)?)?;
    info!(credentials = rotator.len(), "loaded credentials");
    let api_url = args.api_url.as_deref().unwrap_or(&cfg.api_url);
    let client = GitHubClient::new(api_url, &cfg.user_agent)?;
    let users = UserDirectory::new();
    let options = FetchOptions {
        can_wait: args.can_wait,
        cooldown: args
            .cooldown_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| cfg.cooldown()),
        cancel,
    };
    let output = args.output_path();
    let repo = &args.repository;

    let pb = fetch_spinner(format!("fetching commits of {repo}"));

    let mut writer = CommitWriter::create(&output)?;
    let mut failure: Option<anyhow::Error> = None;
    let mut stream = fetch_commits(&client, &users, repo.clone(), rotator, options)?;
    while let Some(item) = stream.next() {
        let commit = match item {
            Ok(commit) => commit,
            Err(e) => {
                failure = Some(e.into());
                break;
            }
        };
        if let Err(e) = writer.append(&commit) {
            failure = Some(e.into());
            break;
        }
        pb.set_message(format!(
            "fetching commits of {}: {} (page {}, {})",
            stream.repository(),
            writer.written(),
            stream.page(),
            short_sha(&commit.sha)
        ));
    }
    let written = writer
        .finish()
        .with_context(|| format!("failed to write {}", output.display()))?;

    match failure {
        None => {
            finish_written(
                &pb,
                format!("{written} commits of {repo} written to {}", output.display()),
            );
            Ok(written)
        }
        Some(e) => {
            finish_stopped(&pb, format!("fetching {repo} stopped after {written} commits"));
            Err(e.context(format!(
                "fetching {repo} stopped after {written} commits; those were kept in {}",
                output.display()
            )))
        }
    }
}

fn load_credentials(args: &FetchArgs, cfg: &Config) -> Result<Vec<Credential>> {
    if let (Some(user), Some(tokens)) = (&args.username, &args.token_file) {
        return Ok(read_tokens(tokens, user)?);
    }
    match args.credentials.as_deref().or(cfg.credentials.as_deref()) {
        Some(path) => Ok(read_credentials(path)?),
        None => bail!(
            "no credentials: pass --credentials, --username with --token-file, \
             or set `credentials` in config.toml"
        ),
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
