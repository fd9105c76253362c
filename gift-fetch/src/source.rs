//! Distribution sources

/// One distribution source ("game"): a name used for on-disk layout, the
/// server-side identifier used in URLs, and the generation its gift
/// records belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub id: String,
    pub generation: u32,
}

impl Source {
    pub fn new(name: impl Into<String>, id: impl Into<String>, generation: u32) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            generation,
        }
    }
}

/// The built-in source list.
pub fn builtin_sources() -> Vec<Source> {
    vec![
        Source::new("Sun", "8QjtffIMWFhiFpTz", 7),
        Source::new("Moon", "7mXz0DXR4b4CdD8r", 7),
        Source::new("X", "h0VRqB2YEgq39zvO", 6),
        Source::new("Y", "Slv7vHlUOfqrKMpz", 6),
        Source::new("Omega Ruby", "cRFY0WFHNjPh44If", 6),
        Source::new("Alpha Sapphire", "guBwm9TlQvYvncKn", 6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sources_are_unique() {
        let sources = builtin_sources();
        assert_eq!(sources.len(), 6);
        for (i, a) in sources.iter().enumerate() {
            for b in &sources[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.id, b.id);
            }
        }
    }
}
