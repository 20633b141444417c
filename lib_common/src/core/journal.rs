//! # Payload Journal
//!
//! Newline-delimited, append-only log of every payload a run delivered.
//!
//! The file handle is a scoped resource: it is acquired on the first append
//! (creating parent directories as needed), flushed after every line, and
//! released exactly once, either through [`PayloadJournal::close`] on the normal
//! path or by `Drop` when the run unwinds through an error or is cancelled.
//! Opening never truncates, so re-running against an existing file appends.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Lazily opened append log owned by a single engine run.
#[derive(Debug)]
pub struct PayloadJournal {
    path: PathBuf,
    handle: Option<BufWriter<File>>,
    appended: u64,
}

impl PayloadJournal {
    /// Binds the journal to `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: None,
            appended: 0,
        }
    }

    /// Destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a handle is currently held.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of lines appended through this journal.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Appends `payload` as one line and flushes it.
    pub fn append(&mut self, payload: &str) -> io::Result<()> {
        if self.handle.is_none() {
            self.handle = Some(Self::open(&self.path)?);
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.write_all(payload.as_bytes())?;
            handle.write_all(b"\n")?;
            handle.flush()?;
            self.appended += 1;
        }
        Ok(())
    }

    /// Flushes and releases the handle. A no-op when nothing was opened or the
    /// handle was already released.
    pub fn close(&mut self) -> io::Result<()> {
        match self.handle.take() {
            Some(mut handle) => {
                log::debug!(
                    "Closing payload journal {} after {} line(s)",
                    self.path.display(),
                    self.appended
                );
                handle.flush()
            }
            None => Ok(()),
        }
    }

    fn open(path: &Path) -> io::Result<BufWriter<File>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log::debug!("Opened payload journal {}", path.display());
        Ok(BufWriter::new(file))
    }
}

impl Drop for PayloadJournal {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to flush payload journal {}: {}", self.path.display(), e);
        }
    }
}
