//! Run log sink
//!
//! Each run writes a timestamped log file. The file is only kept when the
//! run produced something noteworthy (a changed manifest, a download, a
//! decrypt, an error); quiet runs delete their log on close. Lines are
//! mirrored to `tracing` so interactive runs see them immediately.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::Result;
use crate::layout::ensure_dir;

/// Append-only log sink for one run.
///
/// Written from a single task; the sequential processing model needs no
/// synchronization here.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
    noteworthy: bool,
}

impl RunLog {
    /// Open a new run log in `dir`, named from the run timestamp.
    pub async fn create(dir: &Path, stamp: &str) -> Result<Self> {
        ensure_dir(dir).await?;
        let path = dir.join(format!("{stamp}.log"));
        let file = File::create(&path).await?;
        Ok(Self {
            path,
            file,
            noteworthy: false,
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line, mirroring it to `tracing`.
    pub async fn line(&mut self, msg: &str) -> Result<()> {
        info!("{msg}");
        self.file.write_all(msg.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        Ok(())
    }

    /// Mark this run's log worth keeping.
    pub fn mark_noteworthy(&mut self) {
        self.noteworthy = true;
    }

    /// Whether anything noteworthy happened so far.
    #[must_use]
    pub fn is_noteworthy(&self) -> bool {
        self.noteworthy
    }

    /// Flush and close the log, deleting the file if nothing noteworthy
    /// was recorded.
    pub async fn finish(mut self) -> Result<()> {
        self.file.flush().await?;
        drop(self.file);
        if !self.noteworthy {
            tokio::fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}
