//! # crypto-client
//!
//! TCP client for the external decryption oracle used to decrypt BOSS
//! archives. The oracle performs the actual cryptographic transform; this
//! crate only speaks its wire protocol.
//!
//! A session transforms one archive over one connection:
//!
//! 1. send a 1024-byte request header (magic, payload length, mode flags,
//!    key material, IV at fixed offsets);
//! 2. read the 4-byte negotiated chunk size;
//! 3. stream the archive body chunk by chunk, reading each transformed
//!    chunk back in full before sending the next;
//! 4. send the 8-byte session-end sentinel and disconnect.
//!
//! Connections are never pooled; every archive gets a fresh session.
//!
//! ## Example
//!
//! ```no_run
//! use crypto_client::OracleClient;
//!
//! # async fn example(archive: &[u8]) -> crypto_client::Result<()> {
//! let client = OracleClient::new("192.168.1.137:8081".to_string());
//! client.self_test().await?;
//! let decrypted = client.decrypt_archive(archive).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod protocol;

pub use client::OracleClient;
pub use error::{Error, Result};
