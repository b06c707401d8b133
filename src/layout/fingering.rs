//! Fingering expansion
//!
//! Turns each chord bit into a combo of the chord followed by its fingering,
//! so that the fingering's width takes part in collision detection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bit::{Bit, BitKind};

/// Shown in place of a fingering when the chord has no entry in the mapping.
pub const UNKNOWN_FINGERING: &str = "UNKNOWN";

/// Chord name to display fingering, e.g. `G -> 320003`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerings(HashMap<String, String>);

impl Fingerings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chord: &str) -> Option<&str> {
        self.0.get(chord).map(String::as_str)
    }

    pub fn insert(&mut self, chord: impl Into<String>, fingering: impl Into<String>) {
        self.0.insert(chord.into(), fingering.into());
    }

    /// Entries from `other` replace entries for the same chord.
    pub fn merge(&mut self, other: Fingerings) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fingerings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fingerings(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Expand a chord bit into `Combo[Chord, Fingering]`; any other bit is returned as is.
///
/// The fingering starts right after the chord name. A chord missing from
/// `fingerings` gets [`UNKNOWN_FINGERING`].
pub fn expand_fingering(bit: Bit, fingerings: &Fingerings) -> Bit {
    let BitKind::Chord { name, index } = &bit.kind else {
        return bit;
    };

    let fingering = match fingerings.get(name) {
        Some(fingering) => fingering.to_string(),
        None => {
            warn!(chord = %name, "no fingering known for chord, using placeholder");
            UNKNOWN_FINGERING.to_string()
        }
    };
    let fingering_bit = Bit {
        position: bit.end(),
        kind: BitKind::Fingering {
            chord: name.clone(),
            fingering,
            index: *index,
        },
    };
    Bit::combo(bit.position, vec![bit, fingering_bit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chord_becomes_combo() {
        let fingerings: Fingerings = [("G", "320003")].into_iter().collect();
        let expanded = expand_fingering(Bit::indexed_chord(10, "G", 4), &fingerings);
        assert_eq!(
            expanded,
            Bit::combo(
                10,
                vec![
                    Bit::indexed_chord(10, "G", 4),
                    Bit {
                        position: 11,
                        kind: BitKind::Fingering {
                            chord: "G".to_string(),
                            fingering: "320003".to_string(),
                            index: Some(4),
                        },
                    },
                ]
            )
        );
        assert_eq!(expanded.width(), 9);
    }

    #[test]
    fn test_fingering_follows_multi_character_chord() {
        let fingerings: Fingerings = [("C#m7", "x46454")].into_iter().collect();
        let expanded = expand_fingering(Bit::chord(3, "C#m7"), &fingerings);
        let BitKind::Combo { bits } = &expanded.kind else {
            panic!("expected combo, got {:?}", expanded);
        };
        assert_eq!(bits[1].position, 7);
    }

    #[test]
    fn test_missing_chord_uses_placeholder() {
        let expanded = expand_fingering(Bit::chord(0, "Bb"), &Fingerings::new());
        assert_eq!(expanded.content(), "Bb(UNKNOWN)");
    }

    #[test]
    fn test_other_bits_pass_through() {
        let fingerings: Fingerings = [("G", "320003")].into_iter().collect();
        let lyric = Bit::lyric(0, "G is not a chord here");
        assert_eq!(expand_fingering(lyric.clone(), &fingerings), lyric);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base: Fingerings = [("G", "320003"), ("C", "x32010")].into_iter().collect();
        base.merge([("G", "3x0033")].into_iter().collect());
        assert_eq!(base.get("G"), Some("3x0033"));
        assert_eq!(base.get("C"), Some("x32010"));
        assert_eq!(base.len(), 2);
    }
}
