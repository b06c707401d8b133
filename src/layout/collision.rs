//! Collision packing
//!
//! Spreads the bits of one logical line over as few physical lines as needed
//! so that no two bits on the same physical line overlap. Bits never change
//! column; they only move to another line.
//!
//! ## Algorithm
//! Bits are placed from right to left (descending position). Each physical
//! line remembers the leftmost column already taken on it (`last_position`).
//! A bit fits on a line when it ends at or before that column, so the bit is
//! placed on the first line, counting from the anchor line, where it fits.
//!
//! When a bit lands on line `k > 0`, lines `0..k` receive a one-column
//! marker at the bit's column: the anchor line gets [`ENTRY_MARKER`], the lines
//! in between get [`PASS_MARKER`]. Markers take up their column like any other
//! bit. A line that already has a bit starting at that exact column gets no
//! marker. Zero-width bits always stay on the anchor line and never block a
//! column.
//!
//! Line 0 is the anchor line, which renders at the bottom, so the
//! accumulators are reversed at the end to give top-to-bottom order.
//!
//! ```text
//! input:  "Hello" @0, C(x32010) @6, "world" @8
//!
//!       C(x32010)    <- accumulator 1
//! Hello v world      <- accumulator 0 (anchor)
//! ```

use tracing::trace;

use crate::bit::{Bit, LogicalLine, PhysicalLine, ENTRY_MARKER, PASS_MARKER};

/// Bits collected for one physical line while packing.
#[derive(Debug)]
struct LineAccumulator {
    bits: Vec<Bit>,
    /// Leftmost column taken on this line; `usize::MAX` while empty.
    last_position: usize,
}

impl LineAccumulator {
    fn new() -> Self {
        Self {
            bits: Vec::new(),
            last_position: usize::MAX,
        }
    }

    fn fits(&self, bit: &Bit) -> bool {
        bit.end() <= self.last_position
    }

    /// Whether a visible bit already starts at `position`.
    fn starts_at(&self, position: usize) -> bool {
        self.bits
            .iter()
            .any(|b| b.position == position && b.width() > 0)
    }

    /// Zero-width bits take no column, so they leave `last_position` alone.
    fn push(&mut self, bit: Bit) {
        if bit.width() > 0 {
            self.last_position = self.last_position.min(bit.position);
        }
        self.bits.push(bit);
    }
}

/// Pack one logical line into physical lines, ordered top to bottom.
///
/// Always returns at least one line; an empty input yields one empty line.
/// Bits sharing a position are placed in input order.
pub fn pack(line: LogicalLine) -> Vec<PhysicalLine> {
    let mut bits = line;
    // Stable, so equal positions keep their input order.
    bits.sort_by(|a, b| b.position.cmp(&a.position));

    let mut lines = vec![LineAccumulator::new()];
    for bit in bits {
        let mut line_index = 0;
        while !lines[line_index].fits(&bit) {
            line_index += 1;
            if lines.len() <= line_index {
                lines.push(LineAccumulator::new());
            }
        }

        let style = bit.style();
        for (i, line) in lines.iter_mut().take(line_index).enumerate() {
            // A bit starting on the same column already marks it.
            if line.starts_at(bit.position) {
                continue;
            }
            let glyph = if i == 0 { ENTRY_MARKER } else { PASS_MARKER };
            line.push(Bit::marker(bit.position, glyph, style));
        }

        trace!(
            position = bit.position,
            width = bit.width(),
            line = line_index,
            "placed bit"
        );
        lines[line_index].push(bit);
    }

    lines.reverse();
    lines.into_iter().map(|line| line.bits).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit::{BitKind, Style};
    use pretty_assertions::assert_eq;

    fn texts(line: &PhysicalLine) -> Vec<(usize, String)> {
        let mut out: Vec<_> = line
            .iter()
            .map(|b| (b.position, b.content().into_owned()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_empty_line_yields_one_empty_line() {
        let packed = pack(vec![]);
        assert_eq!(packed.len(), 1);
        assert!(packed[0].is_empty());
    }

    #[test]
    fn test_disjoint_bits_share_a_line() {
        let packed = pack(vec![Bit::lyric(0, "Hello"), Bit::chord(5, "G")]);
        assert_eq!(packed.len(), 1);
        assert_eq!(
            texts(&packed[0]),
            vec![(0, "Hello".to_string()), (5, "G".to_string())]
        );
    }

    #[test]
    fn test_overlap_pushes_left_bit_up_with_entry_marker() {
        let packed = pack(vec![Bit::chord(0, "Cmaj"), Bit::lyric(2, "world")]);
        assert_eq!(packed.len(), 2);
        assert_eq!(texts(&packed[0]), vec![(0, "Cmaj".to_string())]);
        assert_eq!(
            texts(&packed[1]),
            vec![(0, "v".to_string()), (2, "world".to_string())]
        );
    }

    #[test]
    fn test_marker_takes_style_of_displaced_bit() {
        let packed = pack(vec![Bit::lyric(0, "long lyric"), Bit::lyric(3, "x")]);
        let marker = packed[1].iter().find(|b| b.position == 0).unwrap();
        assert_eq!(
            marker.kind,
            BitKind::Text {
                text: "v".to_string(),
                style: Some(Style::Lyric)
            }
        );

        let packed = pack(vec![Bit::chord(0, "Dsus2"), Bit::lyric(3, "x")]);
        let marker = packed[1].iter().find(|b| b.position == 0).unwrap();
        assert_eq!(marker.style(), Some(Style::Chord));
    }

    #[test]
    fn test_three_way_overlap_uses_pass_through_marker() {
        // Every bit reaches past the start of the one to its right.
        let packed = pack(vec![
            Bit::lyric(0, "aaaa"),
            Bit::lyric(2, "bbbb"),
            Bit::lyric(4, "cc"),
        ]);
        assert_eq!(packed.len(), 3);
        assert_eq!(texts(&packed[0]), vec![(0, "aaaa".to_string())]);
        assert_eq!(
            texts(&packed[1]),
            vec![(0, "|".to_string()), (2, "bbbb".to_string())]
        );
        assert_eq!(
            texts(&packed[2]),
            vec![
                (0, "v".to_string()),
                (2, "v".to_string()),
                (4, "cc".to_string())
            ]
        );
    }

    #[test]
    fn test_same_start_bits_are_separated() {
        let packed = pack(vec![Bit::lyric(3, "first"), Bit::lyric(3, "second")]);
        assert_eq!(packed.len(), 2);
        // The first in input order is placed first and stays on the anchor line.
        assert_eq!(texts(&packed[0]), vec![(3, "second".to_string())]);
        assert_eq!(texts(&packed[1]), vec![(3, "first".to_string())]);
    }

    #[test]
    fn test_bit_returns_to_anchor_line_when_room() {
        // "ab" at 0 ends before the marker left at column 3.
        let packed = pack(vec![
            Bit::lyric(0, "ab"),
            Bit::lyric(3, "xxxxx"),
            Bit::lyric(5, "y"),
        ]);
        assert_eq!(packed.len(), 2);
        assert_eq!(texts(&packed[0]), vec![(3, "xxxxx".to_string())]);
        assert_eq!(
            texts(&packed[1]),
            vec![
                (0, "ab".to_string()),
                (3, "v".to_string()),
                (5, "y".to_string())
            ]
        );
    }

    #[test]
    fn test_bit_ending_on_marker_column_is_pushed_past_it() {
        // The marker at column 4 blocks "abcde" (ending at 5) from the anchor line.
        let packed = pack(vec![
            Bit::lyric(0, "abcde"),
            Bit::lyric(4, "xxxx"),
            Bit::lyric(6, "y"),
        ]);
        assert_eq!(packed.len(), 3);
        assert_eq!(texts(&packed[0]), vec![(0, "abcde".to_string())]);
        assert_eq!(
            texts(&packed[1]),
            vec![(0, "|".to_string()), (4, "xxxx".to_string())]
        );
        assert_eq!(
            texts(&packed[2]),
            vec![
                (0, "v".to_string()),
                (4, "v".to_string()),
                (6, "y".to_string())
            ]
        );
    }
}
