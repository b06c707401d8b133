//! Whitespace filling
//!
//! Pads a physical line with runs of spaces so that its bits can be rendered
//! by plain concatenation.

use crate::bit::{Bit, PhysicalLine};

/// Sort the line by position and insert space runs in front of every bit
/// that does not start where the previous one ended (column 0 for the first).
///
/// Bits on a physical line must not overlap. Overlap means the packer is
/// broken, and debug builds panic on it. Zero-width bits sort before visible
/// bits on the same column and may sit inside another bit.
pub fn fill_whitespace(line: PhysicalLine) -> PhysicalLine {
    let mut bits = line;
    bits.sort_by_key(|bit| (bit.position, bit.width() > 0));

    let mut filled = Vec::with_capacity(bits.len() * 2);
    let mut current_position = 0;
    for bit in bits {
        if bit.width() == 0 && bit.position < current_position {
            filled.push(bit);
            continue;
        }
        debug_assert!(
            bit.position >= current_position,
            "bit at column {} overlaps the previous bit ending at column {}",
            bit.position,
            current_position
        );
        if current_position < bit.position {
            filled.push(Bit::spaces(
                current_position,
                bit.position - current_position,
            ));
        }
        current_position = bit.end();
        filled.push(bit);
    }
    filled
}
