//! Regulation (ruleset) record decoding
//!
//! A regulation is a fixed 0x4A8-byte record describing a competitive
//! format: scalar fields at fixed byte offsets plus bitfield allow/ban
//! tables over the species, item, and move universes. Bit semantics are
//! LSB-first within each byte; a set bit means the index is banned.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::names::NameTables;

/// Exact size of a regulation record.
pub const REGULATION_LEN: usize = 0x4A8;

/// Base offset of the ban bit tables. All three universes index from the
/// same base, matching the record layout.
const BAN_TABLE_OFFSET: usize = 0x7C;

/// Number of indices the ban tables can address: one bit per index from
/// the table base to the end of the record.
pub const BAN_TABLE_CAPACITY: usize = (REGULATION_LEN - BAN_TABLE_OFFSET) * 8;

/// Offset and UTF-16 code-unit capacity of the title string.
const TITLE_OFFSET: usize = 0x3FC;
/// Offset of the subtitle string.
const SUBTITLE_OFFSET: usize = 0x446;
/// Byte length of each of the two strings.
const TEXT_LEN: usize = 0x4A;

/// Battle format selector (byte 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleFormat {
    Singles,
    Doubles,
    /// Observed as type 3; believed to be Battle Royale.
    Royale,
    /// Observed as type 4; meaning unknown.
    Type4,
}

impl BattleFormat {
    fn label(self) -> &'static str {
        match self {
            Self::Singles => "Singles",
            Self::Doubles => "Doubles",
            Self::Royale => "[Type 3 - Battle Royale?]",
            Self::Type4 => "[Type 4]",
        }
    }
}

impl TryFrom<u8> for BattleFormat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Singles),
            1 => Ok(Self::Doubles),
            2 => Ok(Self::Royale),
            3 => Ok(Self::Type4),
            _ => Err(Error::BadEnumIndex {
                field: "battle format",
                value,
            }),
        }
    }
}

/// Level cap scaling mode (byte 0xC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStyle {
    Normal,
    Minimum,
    Maximum,
    ScaleDown,
    Set,
    ScaleUp,
}

impl LevelStyle {
    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Minimum => "Minimum",
            Self::Maximum => "Maximum",
            Self::ScaleDown => "Scale Down",
            Self::Set => "Set",
            Self::ScaleUp => "Scale Up",
        }
    }
}

impl TryFrom<u8> for LevelStyle {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Minimum),
            2 => Ok(Self::Maximum),
            3 => Ok(Self::ScaleDown),
            4 => Ok(Self::Set),
            5 => Ok(Self::ScaleUp),
            _ => Err(Error::BadEnumIndex {
                field: "level style",
                value,
            }),
        }
    }
}

/// A decoded regulation record.
///
/// Scalars are extracted eagerly at decode time so out-of-range lookup
/// indices surface as a [`Error::BadEnumIndex`] once, not at every access.
/// The raw bytes are retained for the bit tables and for writing the
/// record back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regulation {
    data: Vec<u8>,
    battle_format: BattleFormat,
    level_style: LevelStyle,
}

impl Regulation {
    /// Decode a regulation from exactly [`REGULATION_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// [`Error::BadRecordLength`] for any other length, and
    /// [`Error::BadEnumIndex`] when the battle format or level style byte
    /// does not index its lookup table.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != REGULATION_LEN {
            return Err(Error::BadRecordLength {
                expected: REGULATION_LEN,
                actual: bytes.len(),
            });
        }

        let battle_format = BattleFormat::try_from(bytes[5])?;
        let level_style = LevelStyle::try_from(bytes[0xC])?;

        Ok(Self {
            data: bytes.to_vec(),
            battle_format,
            level_style,
        })
    }

    /// The raw record bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn battle_format(&self) -> BattleFormat {
        self.battle_format
    }

    /// Minimum team size brought to the battle.
    pub fn min_allowed(&self) -> u8 {
        self.data[6]
    }

    /// Maximum team size brought to the battle.
    pub fn max_allowed(&self) -> u8 {
        self.data[7]
    }

    /// Minimum number of team members actually used.
    pub fn min_usable(&self) -> u8 {
        self.data[8]
    }

    /// Maximum number of team members actually used.
    pub fn max_usable(&self) -> u8 {
        self.data[9]
    }

    /// How many legendaries a team may field.
    pub fn legendaries_allowed(&self) -> u8 {
        self.data[0xA]
    }

    pub fn level_cap(&self) -> u8 {
        self.data[0xB]
    }

    pub fn level_style(&self) -> LevelStyle {
        self.level_style
    }

    /// Species clause: no two team members may share a species.
    pub fn species_clause(&self) -> bool {
        self.data[0xE] == 0
    }

    /// Item clause: no two team members may hold the same item.
    pub fn item_clause(&self) -> bool {
        self.data[0xF] == 0
    }

    /// Title string (UTF-16LE, NUL-trimmed).
    pub fn title(&self) -> String {
        self.utf16_at(TITLE_OFFSET)
    }

    /// Subtitle string (UTF-16LE, NUL-trimmed).
    pub fn subtitle(&self) -> String {
        self.utf16_at(SUBTITLE_OFFSET)
    }

    fn utf16_at(&self, offset: usize) -> String {
        let units: Vec<u16> = self.data[offset..offset + TEXT_LEN]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .take_while(|&unit| unit != 0)
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Whether universe index `index` is banned.
    ///
    /// Bit addressing: `byte = base + index / 8`, `bit = index % 8`,
    /// LSB-first. A set bit bans the index; a clear bit allows it.
    /// Indices at or past [`BAN_TABLE_CAPACITY`] have no bit in the record
    /// and are reported as allowed.
    pub fn is_banned(&self, index: usize) -> bool {
        let byte = BAN_TABLE_OFFSET + index / 8;
        self.data
            .get(byte)
            .is_some_and(|b| (b >> (index % 8)) & 1 == 1)
    }

    /// Partition `0..universe_size` into (allowed, banned) index lists.
    ///
    /// The two lists are disjoint and their union covers the whole range.
    /// Universe sizes beyond [`BAN_TABLE_CAPACITY`] are clamped to it, so
    /// an oversized name list can never index past the record.
    pub fn partition(&self, universe_size: usize) -> (Vec<usize>, Vec<usize>) {
        (0..universe_size.min(BAN_TABLE_CAPACITY)).partition(|&i| !self.is_banned(i))
    }

    /// Render a human-readable report of the regulation against the given
    /// name tables. Pure function; performs no I/O.
    pub fn render(&self, names: &NameTables) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Regulation: ");
        let _ = writeln!(out, "{}", self.title());
        let _ = writeln!(out, "{}", self.subtitle());
        let _ = writeln!(
            out,
            "Format: {}, bring {}-{}, use {}-{}.",
            self.battle_format.label(),
            self.min_allowed(),
            self.max_allowed(),
            self.min_usable(),
            self.max_usable(),
        );
        let _ = writeln!(out, "Level cap: {}", self.level_cap());
        let _ = writeln!(out, "Level Cap Scaling Style: {}", self.level_style.label());
        let _ = writeln!(
            out,
            "Number of Legendaries allowed: {}",
            self.legendaries_allowed()
        );
        let _ = writeln!(out, "Species Clause: {}", self.species_clause());
        let _ = writeln!(out, "Item Clause: {}", self.item_clause());

        self.render_universe(&mut out, "Pokemon", names.species());
        self.render_universe(&mut out, "Items", names.items());
        self.render_universe(&mut out, "Moves", names.moves());
        out
    }

    fn render_universe(&self, out: &mut String, what: &str, names: &[String]) {
        let (allowed, banned) = self.partition(names.len());

        for (heading, indices) in [("Allowed", &allowed), ("Banned", &banned)] {
            let _ = writeln!(out);
            let _ = writeln!(out, "=====");
            let _ = writeln!(out, "{heading} {what}");
            let _ = writeln!(out, "=====");
            for &i in indices {
                let _ = writeln!(out, "{}", names[i]);
            }
        }
    }
}
