//! Error types for filelist parsing

use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing filelists and archive identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A filelist line did not have exactly 7 tab-separated fields
    #[error("Bad filelist line (got {fields} fields): {line}")]
    BadFieldCount { fields: usize, line: String },

    /// An archive identifier did not have exactly 4 `-_-`-separated fields
    #[error("Bad archive identifier (got {fields} fields): {id}")]
    BadArchiveId { fields: usize, id: String },

    /// A numeric field failed to parse
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

impl Error {
    /// Create an invalid number error for a named field
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}
