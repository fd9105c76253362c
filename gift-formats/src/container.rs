//! Sub-record container parsing
//!
//! A container blob carries a record count at offset 4 and a table of
//! `(offset: u32, length: u32)` pairs starting at 0x10, stride 8, all
//! little-endian. Entries whose declared length does not match the
//! expected record size, or whose range falls outside the blob, are
//! skipped with a diagnostic rather than failing the whole container.

use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use crate::error::{Error, Result};

/// Offset of the record count field.
const COUNT_OFFSET: usize = 4;

/// Offset of the first table entry.
const TABLE_OFFSET: usize = 0x10;

/// Bytes per table entry.
const TABLE_STRIDE: usize = 8;

/// A parsed container: the sub-record slices that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerArchive {
    records: Vec<Vec<u8>>,
    skipped: usize,
}

impl ContainerArchive {
    /// Split `blob` into sub-records of exactly `expected_len` bytes.
    ///
    /// Table entries with a different declared length or an out-of-range
    /// span are logged and skipped; they are never fatal for the container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] only if the blob cannot hold the
    /// count field or the table itself.
    pub fn parse(blob: &[u8], expected_len: usize) -> Result<Self> {
        if blob.len() < TABLE_OFFSET {
            return Err(Error::TruncatedData {
                expected: TABLE_OFFSET,
                actual: blob.len(),
            });
        }

        let count = LittleEndian::read_u32(&blob[COUNT_OFFSET..COUNT_OFFSET + 4]) as usize;

        let table_end = TABLE_OFFSET.saturating_add(count.saturating_mul(TABLE_STRIDE));
        if blob.len() < table_end {
            return Err(Error::TruncatedData {
                expected: table_end,
                actual: blob.len(),
            });
        }

        let mut records = Vec::with_capacity(count);
        let mut skipped = 0;
        for i in 0..count {
            let entry = TABLE_OFFSET + i * TABLE_STRIDE;
            let offset = LittleEndian::read_u32(&blob[entry..entry + 4]) as usize;
            let len = LittleEndian::read_u32(&blob[entry + 4..entry + 8]) as usize;

            if len != expected_len {
                warn!("Invalid record in container: entry {i} has len {len:#x}, expected {expected_len:#x}");
                skipped += 1;
                continue;
            }

            let Some(end) = offset.checked_add(len) else {
                warn!("Invalid record in container: entry {i} offset overflows");
                skipped += 1;
                continue;
            };
            if end > blob.len() {
                warn!(
                    "Invalid record in container: entry {i} spans {offset:#x}..{end:#x}, blob is {:#x} bytes",
                    blob.len()
                );
                skipped += 1;
                continue;
            }

            records.push(blob[offset..end].to_vec());
        }

        Ok(Self { records, skipped })
    }

    /// Sub-records that passed validation, in table order.
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Number of table entries skipped for bad length or range.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
