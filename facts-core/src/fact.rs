//! The Fact record and card styling helpers.

use serde::{Deserialize, Serialize};

/// A short piece of trivia shown as one feed card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// Short subject line, e.g. "Octopuses".
    pub topic: String,
    /// The trivia itself, one or two sentences.
    pub fact: String,
}

impl Fact {
    pub fn new(topic: impl Into<String>, fact: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            fact: fact.into(),
        }
    }

    /// Trim both fields; `None` if either ends up empty.
    pub fn normalized(self) -> Option<Self> {
        let topic = self.topic.trim();
        let fact = self.fact.trim();
        if topic.is_empty() || fact.is_empty() {
            return None;
        }
        Some(Self::new(topic, fact))
    }
}

/// The card shown when the initial fetch comes back empty.
pub fn fallback_fact() -> Fact {
    Fact::new(
        "Octopuses",
        "An octopus has three hearts: two pump blood through the gills, and the third stops beating while it swims.",
    )
}

/// Index into a style palette for the card at `position`.
///
/// Cards cycle through the palette in order. An empty palette maps
/// everything to slot 0.
pub fn palette_slot(position: usize, palette_len: usize) -> usize {
    if palette_len == 0 {
        0
    } else {
        position % palette_len
    }
}

/// Pick the palette entry for the card at `position`.
pub fn palette_entry<T>(palette: &[T], position: usize) -> Option<&T> {
    palette.get(palette_slot(position, palette.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_rejects_blank() {
        let fact = Fact::new("  Space ", " Venus spins backwards. ").normalized();
        assert_eq!(fact, Some(Fact::new("Space", "Venus spins backwards.")));

        assert!(Fact::new("Space", "   ").normalized().is_none());
        assert!(Fact::new("", "Something").normalized().is_none());
    }

    #[test]
    fn test_palette_slot_wraps() {
        let palette = ["a", "b", "c"];
        for i in 0..10 {
            assert_eq!(palette_entry(&palette, i), Some(&palette[i % palette.len()]));
        }
        assert_eq!(palette_slot(7, 0), 0);
        assert_eq!(palette_entry::<u8>(&[], 3), None);
    }

    #[test]
    fn test_fallback_fact_is_displayable() {
        let fallback = fallback_fact();
        assert!(fallback.clone().normalized().is_some());
        assert!(!fallback.topic.is_empty());
    }
}
