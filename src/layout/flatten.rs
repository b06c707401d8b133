//! Combo flattening

use crate::bit::{Bit, BitKind, PhysicalLine};

/// Replace a combo with its leaves, recursively. Leaves come back as a
/// one-element vector. Order and positions are kept.
pub fn flatten_combo(bit: Bit) -> Vec<Bit> {
    match bit.kind {
        BitKind::Combo { bits } => bits.into_iter().flat_map(flatten_combo).collect(),
        _ => vec![bit],
    }
}

pub fn flatten_line(line: PhysicalLine) -> PhysicalLine {
    line.into_iter().flat_map(flatten_combo).collect()
}
