//! # Layout Module
//!
//! Turns logical tablature lines (lyrics with chords at given columns) into
//! physical lines that can be printed one below the other without any two
//! annotations running into each other.
//!
//! ## Pipeline
//! ```text
//! LogicalLine
//!   → fingering::expand_fingering   (per bit: Chord → Combo[Chord, Fingering])
//!   → collision::pack               (1 logical line → N physical lines)
//!   → whitespace::fill_whitespace   (per physical line)
//!   → flatten::flatten_line         (per physical line: Combo → leaves)
//! ```
//!
//! Every step builds new bits. Nothing here does I/O or keeps state between
//! calls, so independent lines can be laid out on separate threads.
//!
//! ## Example
//! ```rust
//! use chordtab::bit::Bit;
//! use chordtab::layout::{expand_line, Fingerings};
//! use chordtab::render::RenderedLine;
//!
//! let fingerings: Fingerings = [("G", "320003")].into_iter().collect();
//! let lines = expand_line(vec![Bit::lyric(0, "Hello"), Bit::chord(10, "G")], &fingerings);
//!
//! assert_eq!(lines.len(), 1);
//! assert_eq!(RenderedLine::from_bits(&lines[0]).to_text(), "Hello     G(320003)");
//! ```

pub mod collision;
pub mod fingering;
pub mod flatten;
pub mod whitespace;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::bit::{LogicalLine, PhysicalLine, Tablature};

pub use collision::pack;
pub use fingering::{expand_fingering, Fingerings, UNKNOWN_FINGERING};
pub use flatten::{flatten_combo, flatten_line};
pub use whitespace::fill_whitespace;

/// Lay out one logical line into padded, flattened physical lines, top to bottom.
pub fn expand_line(line: LogicalLine, fingerings: &Fingerings) -> Vec<PhysicalLine> {
    let bit_count = line.len();
    let expanded: LogicalLine = line
        .into_iter()
        .map(|bit| expand_fingering(bit, fingerings))
        .collect();

    let packed = pack(expanded);
    debug!(bits = bit_count, lines = packed.len(), "packed logical line");

    packed
        .into_iter()
        .map(fill_whitespace)
        .map(flatten_line)
        .collect()
}

/// Lay out a whole tablature. Logical lines keep their order; each one
/// contributes its physical lines in place.
pub fn expand_all(tablature: Tablature, fingerings: &Fingerings) -> Vec<PhysicalLine> {
    tablature
        .lines
        .into_iter()
        .flat_map(|line| expand_line(line, fingerings))
        .collect()
}
