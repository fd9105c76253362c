//! External gift decoder seam
//!
//! Turning gift payload bytes into a meaningful description requires a
//! game-data library; that capability stays outside this crate. The
//! orchestrator only needs the contract below.

use thiserror::Error;

use gift_formats::payload::GIFT_CONTENT_LEN;

/// The payload bytes were not a recognized gift record.
#[derive(Debug, Error)]
#[error("Unrecognized gift format ({len} bytes, generation {generation})")]
pub struct UnrecognizedGift {
    pub len: usize,
    pub generation: u32,
}

/// A decoded gift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftDescription {
    /// Short record-kind tag, e.g. `wc7`.
    pub kind: String,
    /// Human-readable description for the run log.
    pub summary: String,
    /// Normalized record bytes for the decoded-gift store.
    pub card: Vec<u8>,
}

/// Semantic decoder contract for gift payloads.
pub trait GiftDecoder: Send + Sync {
    /// Decode raw payload bytes of the declared generation.
    fn decode(
        &self,
        bytes: &[u8],
        generation: u32,
    ) -> std::result::Result<GiftDescription, UnrecognizedGift>;
}

/// Minimal built-in decoder: validates the size class and passes the
/// record through untouched, describing only what can be read without
/// game data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeClassDecoder;

impl GiftDecoder for SizeClassDecoder {
    fn decode(
        &self,
        bytes: &[u8],
        generation: u32,
    ) -> std::result::Result<GiftDescription, UnrecognizedGift> {
        if bytes.len() != GIFT_CONTENT_LEN {
            return Err(UnrecognizedGift {
                len: bytes.len(),
                generation,
            });
        }

        Ok(GiftDescription {
            kind: format!("wc{generation}"),
            summary: format!("wc{generation} record, {} bytes", bytes.len()),
            card: bytes.to_vec(),
        })
    }
}
