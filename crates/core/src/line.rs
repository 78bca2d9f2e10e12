//! Line module - compress and merge a single row or column
//!
//! Every directional move is reduced to "slide this line to the left".
//! The board rearranges its cells (reverse / transpose) so that any direction
//! can be expressed through these two functions.

use crate::types::{Line, BOARD_SIZE};

/// Left-pack the non-zero values of a line, preserving their order.
///
/// The tail is padded with zeros. Pure: no score involved.
///
/// ```
/// use twenty48_core::line::compress_line;
///
/// assert_eq!(compress_line([0, 2, 0, 4]), [2, 4, 0, 0]);
/// ```
pub fn compress_line(line: Line) -> Line {
    let mut out = [0; BOARD_SIZE];
    let mut write = 0;
    for value in line {
        if value != 0 {
            out[write] = value;
            write += 1;
        }
    }
    out
}

/// Merge equal neighbours of a left-packed line in one forward pass.
///
/// Each merged value is added to `score`. A freshly merged cell is never
/// merged again in the same pass: the cell to its right is zeroed, so the
/// scan cannot pair it with anything. The result is compressed again.
///
/// Panics if a merged tile or the score no longer fits in a `u32`; boards
/// that pass [`Board::is_well_formed`](crate::board::Board::is_well_formed)
/// never get there.
///
/// ```
/// use twenty48_core::line::merge_line;
///
/// let mut score = 0;
/// assert_eq!(merge_line([2, 2, 4, 4], &mut score), [4, 8, 0, 0]);
/// assert_eq!(score, 12);
/// ```
pub fn merge_line(mut line: Line, score: &mut u32) -> Line {
    for i in 0..BOARD_SIZE - 1 {
        if line[i] != 0 && line[i] == line[i + 1] {
            let merged = line[i]
                .checked_mul(2)
                .unwrap_or_else(|| panic!("merging two {} tiles overflows", line[i]));
            *score = score
                .checked_add(merged)
                .unwrap_or_else(|| panic!("score {} overflows when adding {}", score, merged));
            line[i] = merged;
            line[i + 1] = 0;
        }
    }
    compress_line(line)
}

/// Slide a line to the left: compress, then merge.
#[inline]
pub fn slide_line(line: Line, score: &mut u32) -> Line {
    merge_line(compress_line(line), score)
}
