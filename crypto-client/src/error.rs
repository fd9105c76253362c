//! Error types for oracle sessions

use thiserror::Error;

/// Result type alias for oracle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a decryption oracle session
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during the TCP session
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to connect to the oracle
    #[error("Connection failed to {addr}")]
    ConnectionFailed { addr: String },

    /// The input archive is too short to carry the BOSS header
    #[error("Archive too short: {len} bytes, need at least {min}")]
    ArchiveTooShort { len: usize, min: usize },

    /// The oracle announced an unusable chunk size
    #[error("Oracle announced invalid chunk size: {0}")]
    InvalidChunkSize(u32),

    /// The oracle closed the connection mid-transfer
    #[error("Connection closed with {remaining} bytes outstanding")]
    UnexpectedEof { remaining: usize },

    /// The self-test vector did not decrypt to the expected plaintext
    #[error("Self-test produced incorrect output; check the oracle's key configuration")]
    SelfTestMismatch,
}
