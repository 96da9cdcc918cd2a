use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::codec::CommitReader;
use crate::model::Commit;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Commit file written by `commitfetch fetch`
    #[arg(short, long)]
    pub file: PathBuf,

    /// Show at most this many commits
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// CLI command: print the commits stored in a commit file.
///
/// Example output:
/// ```text
/// 7fd1a60b01f91b314f59955a4e4d4e80d8edf11d
///   Repository: octocat/Hello-World
///   Moment:     2012-03-06T23:06:50Z
///   Author:     octocat (The Octocat)
///   Files:
///     README
///
///   Merge pull request #6 from Spaceghost/patch-1
/// ```
///
/// # Errors
/// Returns an error if the file cannot be opened or a record is invalid.
pub fn cmd_show(args: ShowArgs) -> Result<()> {
    let reader = CommitReader::open(&args.file)?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for item in reader.take(limit) {
        let commit = item.with_context(|| format!("failed to read {}", args.file.display()))?;
        write_commit(&mut out, &commit)?;
    }
    Ok(())
}

fn write_commit(out: &mut impl Write, c: &Commit) -> io::Result<()> {
    writeln!(out, "{}", c.sha.yellow())?;
    writeln!(out, "  Repository: {}", c.repository)?;
    writeln!(out, "  Moment:     {}", c.moment_text())?;
    match &c.author {
        Some(u) => match &u.name {
            Some(name) => writeln!(out, "  Author:     {} ({})", u.login, name)?,
            None => writeln!(out, "  Author:     {}", u.login)?,
        },
        None => writeln!(out, "  Author:     -")?,
    }
    writeln!(out, "  Files:")?;
    for f in &c.files {
        writeln!(out, "    {}", f.display())?;
    }
    writeln!(out)?;
    for line in c.message.lines() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RepoIdentity, User};
    use chrono::{TimeZone, Utc};

    #[test]
    fn prints_commit_summary() {
        colored::control::set_override(false);
        let c = Commit {
            sha: "abc123".into(),
            message: "Subject\n\nBody".into(),
            repository: RepoIdentity::new("o", "n"),
            moment: Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap(),
            author: Some(User::new(1, "octocat", None)),
            files: vec!["a.txt".into(), "b/c.rs".into()],
        };
        let mut buf = Vec::new();
        write_commit(&mut buf, &c).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("abc123\n"));
        assert!(text.contains("  Repository: o/n\n"));
        assert!(text.contains("  Moment:     2020-01-02T03:04:05Z\n"));
        assert!(text.contains("  Author:     octocat\n"));
        assert!(text.contains("    b/c.rs\n"));
        assert!(text.contains("  Subject\n  \n  Body\n"));
    }
}
