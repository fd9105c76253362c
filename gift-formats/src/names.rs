//! Name tables for the three enumerable universes
//!
//! Regulation bit tables index into externally supplied enumerations. The
//! universe sizes are not self-describing; whoever loads the tables
//! decides them. A real deployment feeds these from a game-data string
//! dump; [`NameTables::indexed`] gives numeric placeholder labels when no
//! dump is available.

/// Name lists for the species, item, and move universes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTables {
    species: Vec<String>,
    items: Vec<String>,
    moves: Vec<String>,
}

impl NameTables {
    /// Build tables from explicit name lists.
    #[must_use]
    pub fn new(species: Vec<String>, items: Vec<String>, moves: Vec<String>) -> Self {
        Self {
            species,
            items,
            moves,
        }
    }

    /// Placeholder tables labelling each index numerically
    /// (`Species #0007`, `Item #0001`, ...).
    #[must_use]
    pub fn indexed(species: usize, items: usize, moves: usize) -> Self {
        let label = |what: &str, n: usize| (0..n).map(|i| format!("{what} #{i:04}")).collect();
        Self {
            species: label("Species", species),
            items: label("Item", items),
            moves: label("Move", moves),
        }
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }
}
