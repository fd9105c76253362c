//! Error types for BOSS HTTP operations

use thiserror::Error;

/// Result type alias for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the BOSS servers
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    BadStatus { status: u16, url: String },

    /// The response body was not valid text
    #[error("Response was not valid UTF-8: {url}")]
    NotText { url: String },
}
