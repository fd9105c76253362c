//! # boss-manifest
//!
//! Parser for the tab-delimited filelists served by the BOSS content
//! distribution service, and for the archive identifiers derived from them.
//!
//! A filelist is newline-separated text; every non-empty line containing a
//! tab is a 7-field record describing one downloadable archive:
//!
//! ```text
//! name \t (unused) \t kind \t id \t (unused) \t content_size \t timestamp
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use boss_manifest::{Manifest, ManifestEntry};
//!
//! let text = "Foo\tX\tEvent\tID123\tY\t1024\t1700000000";
//! let manifest = Manifest::parse(text)?;
//! assert_eq!(manifest.entries().len(), 1);
//!
//! let entry = &manifest.entries()[0];
//! assert_eq!(entry.archive_id(), "Foo-_-Event-_-ID123-_-1700000000");
//! # Ok::<(), boss_manifest::Error>(())
//! ```

pub mod entry;
pub mod error;
pub mod manifest;

pub use entry::ManifestEntry;
pub use error::{Error, Result};
pub use manifest::Manifest;
