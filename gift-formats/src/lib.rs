//! # gift-formats
//!
//! Parsers for the fixed-layout binary records found inside decrypted BOSS
//! payloads:
//!
//! - [`ContainerArchive`]: a blob holding multiple fixed-size sub-records
//!   addressed through an embedded offset/length table;
//! - [`Regulation`]: a 0x4A8-byte competitive-format ruleset record with
//!   scalar fields at fixed offsets and bitfield allow/ban tables over the
//!   species, item, and move universes;
//! - [`classify`]: the single routing function that maps a decrypted
//!   payload's size and its entry name to a [`PayloadKind`].
//!
//! All parsers here are pure; they never perform I/O.

pub mod container;
pub mod error;
pub mod names;
pub mod payload;
pub mod regulation;

pub use container::ContainerArchive;
pub use error::{Error, Result};
pub use names::NameTables;
pub use payload::{PayloadKind, classify, strip_envelope};
pub use regulation::{BattleFormat, LevelStyle, Regulation};
