//! Structured tablature documents
//!
//! Besides plain chord sheets, tablatures can be handed over already split
//! into bits, as YAML or JSON:
//!
//! ```yaml
//! title: Example
//! fingerings:
//!   G: "320003"
//! lines:
//!   - - { kind: text, position: 0, text: Hello }
//!     - { kind: chord, position: 10, chord: G }
//! ```
//!
//! A chord bit without a chord name cannot be laid out; it is dropped with a
//! warning and the rest of its line is kept.

use serde::Deserialize;
use tracing::warn;

use crate::bit::{Bit, BitKind, LogicalLine, Tablature};
use crate::error::TabError;
use crate::layout::Fingerings;
use crate::sheet::{Song, SongMetadata, DEFAULT_INSTRUMENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawKind {
    Text,
    Chord,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBit {
    pub kind: RawKind,
    pub position: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "chordName")]
    pub chord: Option<String>,
}

impl RawBit {
    /// `None` for a malformed bit.
    fn into_bit(self) -> Option<Bit> {
        match self.kind {
            RawKind::Text => Some(Bit::lyric(self.position, self.text)),
            RawKind::Chord => match self.chord {
                Some(name) if !name.trim().is_empty() => Some(Bit::chord(self.position, name)),
                _ => {
                    warn!(
                        position = self.position,
                        text = %self.text,
                        "dropping chord bit without a chord name"
                    );
                    None
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablatureDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub fingerings: Fingerings,
    pub lines: Vec<Vec<RawBit>>,
}

impl TablatureDocument {
    pub fn from_yaml(source: &str) -> Result<Self, TabError> {
        serde_yaml::from_str(source).map_err(|e| TabError::Document(e.to_string()))
    }

    pub fn from_json(source: &str) -> Result<Self, TabError> {
        serde_json::from_str(source).map_err(|e| TabError::Document(e.to_string()))
    }

    /// Build a song, dropping malformed bits and numbering chords in reading order.
    pub fn into_song(self) -> Song {
        let mut chord_index = 0;
        let lines = self
            .lines
            .into_iter()
            .map(|raw_line| {
                let mut line: LogicalLine =
                    raw_line.into_iter().filter_map(RawBit::into_bit).collect();
                number_chords(&mut line, &mut chord_index);
                line
            })
            .collect();

        Song {
            metadata: SongMetadata {
                title: self.title,
                artist: self.artist,
                instrument: self
                    .instrument
                    .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string()),
                fingerings: self.fingerings,
            },
            tablature: Tablature::new(lines),
        }
    }
}

/// Give the chords of a line consecutive indices, left to right.
fn number_chords(line: &mut LogicalLine, next_index: &mut usize) {
    let mut chords: Vec<&mut Bit> = line
        .iter_mut()
        .filter(|bit| matches!(bit.kind, BitKind::Chord { .. }))
        .collect();
    chords.sort_by_key(|bit| bit.position);
    for bit in chords {
        if let BitKind::Chord { index, .. } = &mut bit.kind {
            *index = Some(*next_index);
            *next_index += 1;
        }
    }
}
