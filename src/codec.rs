//! Line-oriented persistence of commits.
//!
//! Each line is one JSON object:
//!
//! ```text
//! {"sha":"7fd1a60","message":"Fix\nbugs","repository":"octocat/Hello-World","moment":"2011-04-14T16:00:49Z","author":{"id":1,"login":"octocat","name":null},"files":["README"]}
//! ```
//!
//! Control characters inside strings are escaped, so a record never spans
//! two lines. A missing author is written as `null`.
//!
//! Files are written through a temporary file next to the destination and
//! renamed over it on [`CommitWriter::finish`], so an interrupted write never
//! leaves a truncated file behind.

use std::borrow::Borrow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Lines, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::CodecError;
use crate::model::Commit;

/// Encode one commit as a single line, without the trailing newline.
pub fn encode_commit(commit: &Commit) -> Result<String, CodecError> {
    serde_json::to_string(commit).map_err(|source| CodecError::Encode {
        sha: commit.sha.clone(),
        source,
    })
}

/// Decode one line produced by [`encode_commit`]. The error is a reason only;
/// callers attach the location.
pub fn decode_commit(line: &str) -> Result<Commit, String> {
    let commit: Commit = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if commit.sha.is_empty() {
        return Err("empty sha".into());
    }
    Ok(commit)
}

/// Streaming writer used to checkpoint commits as they arrive.
///
/// Nothing is visible at `path` until [`finish`](Self::finish) is called;
/// dropping the writer discards what was appended.
pub struct CommitWriter {
    path: PathBuf,
    out: BufWriter<NamedTempFile>,
    written: usize,
}

impl CommitWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tmp = tempfile::Builder::new()
            .prefix(".commitfetch")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|source| io_error(&path, source))?;
        Ok(Self {
            path,
            out: BufWriter::new(tmp),
            written: 0,
        })
    }

    pub fn append(&mut self, commit: &Commit) -> Result<(), CodecError> {
        let line = encode_commit(commit)?;
        writeln!(self.out, "{line}").map_err(|source| io_error(&self.path, source))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and move the file into place, replacing any existing file.
    /// Returns the number of records written.
    pub fn finish(self) -> Result<usize, CodecError> {
        let Self { path, out, written } = self;
        let tmp = out
            .into_inner()
            .map_err(|e| io_error(&path, e.into_error()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|source| io_error(&path, source))?;
        tmp.persist(&path)
            .map_err(|e| io_error(&path, e.error))?;
        info!(path = %path.display(), commits = written, "wrote commit file");
        Ok(written)
    }
}

/// Write `commits` to `path`, one per line, replacing the file.
pub fn write_commits<I>(path: impl AsRef<Path>, commits: I) -> Result<usize, CodecError>
where
    I: IntoIterator,
    I::Item: Borrow<Commit>,
{
    let mut writer = CommitWriter::create(path)?;
    for commit in commits {
        writer.append(commit.borrow())?;
    }
    writer.finish()
}

/// Lazy reader over a commit file. Blank lines are skipped; the first bad
/// record ends the iteration with an error naming its line.
pub struct CommitReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
    failed: bool,
}

impl CommitReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| io_error(&path, source))?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
            failed: false,
        })
    }
}

impl Iterator for CommitReader {
    type Item = Result<Commit, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let result = match line {
                Ok(l) if l.trim().is_empty() => continue,
                Ok(l) => decode_commit(&l).map_err(|reason| CodecError::Parse {
                    path: self.path.clone(),
                    line: self.line_no,
                    reason,
                }),
                Err(e) if e.kind() == ErrorKind::InvalidData => Err(CodecError::Parse {
                    path: self.path.clone(),
                    line: self.line_no,
                    reason: "line is not valid UTF-8".into(),
                }),
                Err(source) => Err(io_error(&self.path, source)),
            };
            self.failed = result.is_err();
            return Some(result);
        }
        None
    }
}

/// Read every commit of `path` in file order.
pub fn read_commits(path: impl AsRef<Path>) -> Result<Vec<Commit>, CodecError> {
    CommitReader::open(path)?.collect()
}

fn io_error(path: &Path, source: std::io::Error) -> CodecError {
    CodecError::Io {
        path: path.to_path_buf(),
        source,
    }
}
