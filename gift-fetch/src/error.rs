//! Error type for the fetch orchestrator

use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the fetch pipeline.
///
/// Most failures are handled where they occur (logged, unit skipped); the
/// variants here are the ones that end a source's update cycle or the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The authoritative filelist for a source failed to parse
    #[error("Manifest for {source} is corrupt: {inner}")]
    CorruptManifest {
        source: String,
        #[source]
        inner: boss_manifest::Error,
    },

    /// HTTP failure fetching the authoritative filelist
    #[error(transparent)]
    Http(#[from] boss_client::Error),

    /// Oracle session failure
    #[error(transparent)]
    Oracle(#[from] crypto_client::Error),

    /// Filesystem failure in one of the stores
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
