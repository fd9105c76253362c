//! Filelist documents and snapshot comparison

use crate::entry::ManifestEntry;
use crate::error::Result;

/// A parsed filelist snapshot for one distribution source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse a filelist document.
    ///
    /// Non-empty lines containing a tab are parsed as 7-field records; other
    /// lines are ignored. The first malformed record fails the whole parse:
    /// a filelist that no longer matches the expected shape means the server
    /// format changed, and continuing would silently drop archives.
    ///
    /// # Errors
    ///
    /// Propagates the first [`crate::Error`] from any retained line.
    pub fn parse(text: &str) -> Result<Self> {
        let entries = text
            .lines()
            .filter(|line| !line.is_empty() && line.contains('\t'))
            .map(ManifestEntry::from_line)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Entries in server order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Compute the download worklist given the previous snapshot.
    ///
    /// Returns the entire new manifest unchanged. Per-archive deduplication
    /// is handled downstream by checking whether the archive already exists
    /// on disk; the old snapshot only decides whether the source is
    /// considered changed at all (exact text comparison, done by the
    /// caller). This mirrors the production behavior and is intentional,
    /// not an optimization opportunity.
    pub fn diff<'a>(_old: &Manifest, new: &'a Manifest) -> &'a [ManifestEntry] {
        new.entries()
    }

    /// Entries in `self` that supersede an entry of `older` (same name,
    /// kind, and id with a strictly greater timestamp).
    pub fn updates_of<'a>(&'a self, older: &Manifest) -> Vec<&'a ManifestEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                older
                    .entries
                    .iter()
                    .any(|old| entry.is_updated_version_of(old))
            })
            .collect()
    }
}
