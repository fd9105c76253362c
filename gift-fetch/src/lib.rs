//! # gift-fetch
//!
//! The orchestrator behind the `gift-fetch` binary. For each configured
//! distribution source it checks the server filelist against the stored
//! snapshot, downloads archives that are not yet on disk, runs the oracle
//! self-test, then decrypts pending archives and routes each decrypted
//! payload to the right store: gift records, cup containers, or
//! generation-7 regulation containers.
//!
//! Processing is strictly sequential by design: sources one at a time,
//! and within a source, manifest check, then downloads, then
//! decrypt/extract. The workload is low-volume and I/O-bound; nothing
//! here is worth parallelizing.

pub mod decoder;
pub mod error;
pub mod layout;
pub mod orchestrator;
pub mod runlog;
pub mod source;

pub use decoder::{GiftDecoder, GiftDescription, SizeClassDecoder, UnrecognizedGift};
pub use error::{Error, Result};
pub use layout::Layout;
pub use orchestrator::FetchOrchestrator;
pub use runlog::RunLog;
pub use source::Source;
