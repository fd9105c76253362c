//! On-disk layout of the fetch pipeline's stores
//!
//! Everything lives under one root:
//!
//! ```text
//! data/<source>/list.txt            raw filelist snapshot
//! data/<source>/boss/<archive_id>   encrypted archives
//! data/<source>/boss_dec/<file>     decrypted archives
//! wondercards/<source>/wc<g>full/   full gift payloads
//! wondercards/<source>/wc<g>/       decoded gift records
//! cups/<source>/{bin,txt}/          cup regulations, binary and rendered
//! regulations/<source>/{bin,txt}/   gen-7 regulations, binary and rendered
//! logs/                             run logs
//! ```
//!
//! Presence of a destination file is itself the "already processed"
//! marker; no separate index is kept. A partially written file (from a
//! killed run) therefore blocks reprocessing until removed by hand —
//! accepted, documented risk.

use std::path::{Path, PathBuf};

use boss_manifest::ManifestEntry;

use crate::error::Result;
use crate::source::Source;

/// Path helper for every store the pipeline writes to.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn source_dir(&self, source: &Source) -> PathBuf {
        self.root.join("data").join(&source.name)
    }

    /// Raw filelist snapshot for a source.
    #[must_use]
    pub fn manifest_path(&self, source: &Source) -> PathBuf {
        self.source_dir(source).join("list.txt")
    }

    /// Directory of encrypted archives for a source.
    #[must_use]
    pub fn encrypted_dir(&self, source: &Source) -> PathBuf {
        self.source_dir(source).join("boss")
    }

    /// Encrypted archive store, keyed by archive identifier.
    #[must_use]
    pub fn encrypted_path(&self, source: &Source, entry: &ManifestEntry) -> PathBuf {
        self.encrypted_dir(source).join(entry.archive_id())
    }

    /// Decrypted archive store, keyed by `name_kind_timestamp`.
    #[must_use]
    pub fn decrypted_path(&self, source: &Source, entry: &ManifestEntry) -> PathBuf {
        self.source_dir(source).join("boss_dec").join(entry.file_name())
    }

    /// Store for full gift payloads.
    #[must_use]
    pub fn gift_full_path(&self, source: &Source, entry: &ManifestEntry) -> PathBuf {
        let g = source.generation;
        self.root
            .join("wondercards")
            .join(&source.name)
            .join(format!("wc{g}full"))
            .join(format!("{}.wc{g}full", entry.file_name()))
    }

    /// Store for decoded gift records.
    #[must_use]
    pub fn gift_path(&self, source: &Source, entry: &ManifestEntry) -> PathBuf {
        let g = source.generation;
        self.root
            .join("wondercards")
            .join(&source.name)
            .join(format!("wc{g}"))
            .join(format!("{}.wc{g}", entry.file_name()))
    }

    /// Destination for cup regulation records.
    #[must_use]
    pub fn cup_dir(&self, source: &Source) -> PathBuf {
        self.root.join("cups").join(&source.name)
    }

    /// Destination for generation-7 regulation records.
    #[must_use]
    pub fn regulation_dir(&self, source: &Source) -> PathBuf {
        self.root.join("regulations").join(&source.name)
    }

    /// Directory for run logs.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Read the stored filelist snapshot, if any.
    pub async fn read_manifest_snapshot(&self, source: &Source) -> Result<Option<String>> {
        let path = self.manifest_path(source);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored filelist snapshot.
    pub async fn write_manifest_snapshot(&self, source: &Source, text: &str) -> Result<()> {
        write(&self.manifest_path(source), text.as_bytes()).await
    }
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if tokio::fs::metadata(path).await.is_err() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Write a file, creating its parent directory if necessary.
pub async fn write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}
