//! # boss-client
//!
//! HTTP client for the BOSS content-distribution servers: the filelist
//! server that publishes per-source manifests and the file server that
//! hosts the encrypted archives.
//!
//! The production service sits behind client-certificate TLS; certificate
//! handling is outside this crate's scope. What is carried here is the
//! console-shaped user agent, request shaping, and URL construction, with
//! configurable base URLs so tests can point the client at a local mock
//! server.
//!
//! ## Example
//!
//! ```no_run
//! use boss_client::HttpClient;
//!
//! # async fn example() -> boss_client::Result<()> {
//! let client = HttpClient::new()?;
//! let manifest = client.get_text(&client.filelist_url("8QjtffIMWFhiFpTz")).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;

pub use error::{Error, Result};
pub use http::HttpClient;
