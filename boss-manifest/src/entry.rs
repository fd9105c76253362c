//! Filelist entries and archive identifiers

use crate::error::{Error, Result};

/// Delimiter used when rendering an entry as an archive identifier.
///
/// Chosen by the service to be a string that cannot appear in any of the
/// joined fields.
pub const ARCHIVE_ID_DELIMITER: &str = "-_-";

/// Number of tab-separated fields in a well-formed filelist line.
const LINE_FIELDS: usize = 7;

/// Number of fields in an archive identifier.
const ARCHIVE_ID_FIELDS: usize = 4;

/// One archive described by a BOSS filelist.
///
/// Only five of the seven wire fields carry meaning for us; fields 1 and 4
/// are present in the format but unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Archive name as listed by the server (field 0)
    pub name: String,
    /// Archive kind (field 2)
    pub kind: String,
    /// Server-assigned identifier (field 3)
    pub id: String,
    /// Declared content size in bytes (field 5).
    ///
    /// `None` when the entry was reconstructed from an archive identifier,
    /// which does not encode the size. This loss is by design.
    pub content_size: Option<u64>,
    /// Publication timestamp (field 6)
    pub timestamp: u64,
}

impl ManifestEntry {
    /// Parse an entry from a 7-field tab-delimited filelist line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadFieldCount`] if the line does not have exactly
    /// seven fields, and [`Error::InvalidNumber`] if the size or timestamp
    /// fields are not integers.
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != LINE_FIELDS {
            return Err(Error::BadFieldCount {
                fields: fields.len(),
                line: line.to_string(),
            });
        }

        let content_size = fields[5]
            .parse::<u64>()
            .map_err(|_| Error::invalid_number("content_size", fields[5]))?;
        let timestamp = fields[6]
            .parse::<u64>()
            .map_err(|_| Error::invalid_number("timestamp", fields[6]))?;

        Ok(Self {
            name: fields[0].to_string(),
            kind: fields[2].to_string(),
            id: fields[3].to_string(),
            content_size: Some(content_size),
            timestamp,
        })
    }

    /// Reconstruct an entry from an archive identifier (typically an on-disk
    /// filename produced by [`archive_id`](Self::archive_id)).
    ///
    /// The content size is not encoded in the identifier, so the returned
    /// entry has `content_size: None`.
    pub fn from_archive_id(archive_id: &str) -> Result<Self> {
        let fields: Vec<&str> = archive_id.split(ARCHIVE_ID_DELIMITER).collect();
        if fields.len() != ARCHIVE_ID_FIELDS {
            return Err(Error::BadArchiveId {
                fields: fields.len(),
                id: archive_id.to_string(),
            });
        }

        let timestamp = fields[3]
            .parse::<u64>()
            .map_err(|_| Error::invalid_number("timestamp", fields[3]))?;

        Ok(Self {
            name: fields[0].to_string(),
            kind: fields[1].to_string(),
            id: fields[2].to_string(),
            content_size: None,
            timestamp,
        })
    }

    /// Stable identifier for this archive: `name-_-kind-_-id-_-timestamp`.
    ///
    /// Doubles as the filename under which the encrypted archive is stored.
    pub fn archive_id(&self) -> String {
        format!(
            "{name}{d}{kind}{d}{id}{d}{ts}",
            name = self.name,
            kind = self.kind,
            id = self.id,
            ts = self.timestamp,
            d = ARCHIVE_ID_DELIMITER,
        )
    }

    /// Key under which the decrypted archive is stored: `name_kind_timestamp`.
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}", self.name, self.kind, self.timestamp)
    }

    /// Whether `self` supersedes `other`: same name, kind, and id, with a
    /// strictly greater timestamp (numeric comparison).
    ///
    /// This relation is neither symmetric nor reflexive.
    pub fn is_updated_version_of(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.id == other.id
            && self.timestamp > other.timestamp
    }
}
