//! # Bit Model
//!
//! A tablature is made of positioned annotations called bits. Every bit sits at
//! a column (`position`, 0-based, counted in characters) within its line and
//! covers `width` columns from there.
//!
//! ## Type Hierarchy
//! ```text
//! Tablature
//!   └── Vec<LogicalLine>          (one per source row)
//!         └── Vec<Bit>
//!               ├── position: usize
//!               └── kind: BitKind
//!                     ├── Text { text, style }
//!                     ├── Chord { name, index }
//!                     ├── Fingering { chord, fingering, index }
//!                     └── Combo { bits: Vec<Bit> }
//! ```
//!
//! ## Widths
//! - Text: number of characters in `text`
//! - Chord: number of characters in `name`
//! - Fingering: number of characters in `fingering` + 2 (rendered as `(…)`)
//! - Combo: sum of the children's widths
//!
//! Widths are always derived from the payload, never stored.
//!
//! Bits are immutable values. The layout passes build new bits rather than
//! editing existing ones.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Glyph placed on the line where a displaced bit belongs.
pub const ENTRY_MARKER: &str = "v";
/// Glyph placed on lines a displaced bit's link passes through.
pub const PASS_MARKER: &str = "|";

/// Presentation tag carried into the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Lyric,
    Chord,
    Fingering,
}

impl Style {
    pub fn class(self) -> &'static str {
        match self {
            Style::Lyric => "lyric",
            Style::Chord => "chord",
            Style::Fingering => "fingering",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitKind {
    /// Literal text. Unstyled text is layout filler (whitespace runs).
    Text { text: String, style: Option<Style> },
    /// A chord name. `index` is the tablature-wide chord number used to
    /// cross-reference the chord with its fingering in a UI.
    Chord { name: String, index: Option<usize> },
    /// The fingering shown next to a chord; `chord` and `index` point back at
    /// the chord it belongs to.
    Fingering {
        chord: String,
        fingering: String,
        index: Option<usize>,
    },
    /// A group of bits laid out as one unit. Children keep absolute positions.
    Combo { bits: Vec<Bit> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bit {
    pub position: usize,
    pub kind: BitKind,
}

impl Bit {
    pub fn lyric(position: usize, text: impl Into<String>) -> Self {
        Bit {
            position,
            kind: BitKind::Text {
                text: text.into(),
                style: Some(Style::Lyric),
            },
        }
    }

    /// Unstyled text, used for padding between bits.
    pub fn spaces(position: usize, count: usize) -> Self {
        Bit {
            position,
            kind: BitKind::Text {
                text: " ".repeat(count),
                style: None,
            },
        }
    }

    /// A one-column continuation marker styled like the bit it stands in for.
    pub fn marker(position: usize, glyph: &str, style: Option<Style>) -> Self {
        Bit {
            position,
            kind: BitKind::Text {
                text: glyph.to_string(),
                style,
            },
        }
    }

    pub fn chord(position: usize, name: impl Into<String>) -> Self {
        Bit {
            position,
            kind: BitKind::Chord {
                name: name.into(),
                index: None,
            },
        }
    }

    pub fn indexed_chord(position: usize, name: impl Into<String>, index: usize) -> Self {
        Bit {
            position,
            kind: BitKind::Chord {
                name: name.into(),
                index: Some(index),
            },
        }
    }

    pub fn fingering(
        position: usize,
        chord: impl Into<String>,
        fingering: impl Into<String>,
    ) -> Self {
        Bit {
            position,
            kind: BitKind::Fingering {
                chord: chord.into(),
                fingering: fingering.into(),
                index: None,
            },
        }
    }

    pub fn combo(position: usize, bits: Vec<Bit>) -> Self {
        Bit {
            position,
            kind: BitKind::Combo { bits },
        }
    }

    /// Number of columns this bit covers.
    pub fn width(&self) -> usize {
        match &self.kind {
            BitKind::Text { text, .. } => text.chars().count(),
            BitKind::Chord { name, .. } => name.chars().count(),
            BitKind::Fingering { fingering, .. } => fingering.chars().count() + 2,
            BitKind::Combo { bits } => bits.iter().map(Bit::width).sum(),
        }
    }

    /// First column past the end of this bit.
    pub fn end(&self) -> usize {
        self.position + self.width()
    }

    /// Style of the bit; a combo takes the style of its first child.
    pub fn style(&self) -> Option<Style> {
        match &self.kind {
            BitKind::Text { style, .. } => *style,
            BitKind::Chord { .. } => Some(Style::Chord),
            BitKind::Fingering { .. } => Some(Style::Fingering),
            BitKind::Combo { bits } => bits.first().and_then(Bit::style),
        }
    }

    /// The characters this bit puts on the line.
    pub fn content(&self) -> Cow<'_, str> {
        match &self.kind {
            BitKind::Text { text, .. } => Cow::Borrowed(text.as_str()),
            BitKind::Chord { name, .. } => Cow::Borrowed(name.as_str()),
            BitKind::Fingering { fingering, .. } => Cow::Owned(format!("({})", fingering)),
            BitKind::Combo { bits } => Cow::Owned(bits.iter().map(|b| b.content()).collect()),
        }
    }

    pub fn is_combo(&self) -> bool {
        matches!(self.kind, BitKind::Combo { .. })
    }

    pub fn chord_name(&self) -> Option<&str> {
        match &self.kind {
            BitKind::Chord { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether the column ranges of two bits intersect. Zero-width bits never overlap.
    pub fn overlaps(&self, other: &Bit) -> bool {
        self.position < other.end() && other.position < self.end()
    }
}

/// One source row: bits in any order, possibly overlapping.
pub type LogicalLine = Vec<Bit>;

/// One output row: bits that never overlap.
pub type PhysicalLine = Vec<Bit>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tablature {
    pub lines: Vec<LogicalLine>,
}

impl Tablature {
    pub fn new(lines: Vec<LogicalLine>) -> Self {
        Self { lines }
    }

    /// Name of the first chord in reading order.
    pub fn first_chord(&self) -> Option<&str> {
        self.lines
            .iter()
            .flat_map(|line| line.iter())
            .find_map(Bit::chord_name)
    }

    pub fn chord_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|line| line.iter())
            .filter(|bit| bit.chord_name().is_some())
            .count()
    }
}
