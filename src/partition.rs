//! Proportional input partitioning, snapped to word boundaries.

use crate::alphabet::letter_index;

/// Half-open byte range of the partition owned by worker `rank` out of
/// `workers`.
///
/// The raw cut for boundary `r` sits at `r * len / workers` and then moves
/// forward to the first separator byte, so no cut ever lands between two
/// letters of the same word. Adjacent ranks compute identical cuts, which
/// makes the ranges tile the input exactly: rank 0 begins at 0, rank
/// `workers - 1` ends at `len`, and each rank's end is the next rank's
/// begin.
pub fn partition_bounds(text: &[u8], rank: usize, workers: usize) -> (usize, usize) {
    debug_assert!(workers > 0);
    debug_assert!(rank < workers);
    (cut(text, rank, workers), cut(text, rank + 1, workers))
}

/// Cut point for boundary `rank` of `workers`: the first separator byte at
/// or after the proportional split, or a buffer edge.
fn cut(text: &[u8], rank: usize, workers: usize) -> usize {
    let mut at = rank * text.len() / workers;
    if at == 0 {
        return 0;
    }
    while at < text.len() && letter_index(text[at]).is_some() {
        at += 1;
    }
    at
}
