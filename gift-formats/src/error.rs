//! Error types for payload parsing

use thiserror::Error;

/// Result type for format operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding gift payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The blob is too small to hold the structure being read
    #[error("Truncated data: needed {expected} bytes, have {actual}")]
    TruncatedData { expected: usize, actual: usize },

    /// A record had an unexpected length
    #[error("Bad record length: expected {expected:#x}, got {actual:#x}")]
    BadRecordLength { expected: usize, actual: usize },

    /// A fixed lookup-table field held an out-of-range index
    #[error("Out-of-range {field} index: {value}")]
    BadEnumIndex { field: &'static str, value: u8 },
}
