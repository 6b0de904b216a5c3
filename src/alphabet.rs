//! Byte classification: the 26-letter alphabet and what separates words.

/// Number of distinct letters a node can branch on.
pub const ALPHABET: usize = 26;

/// Classify a byte: `Some(0..=25)` for `a-z`/`A-Z` (case folded together),
/// `None` for everything else. Total over all byte values — an unrecognized
/// byte is a word separator, never an error.
#[inline]
pub fn letter_index(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some((byte - b'a') as usize),
        b'A'..=b'Z' => Some((byte - b'A') as usize),
        _ => None,
    }
}

/// The lowercase letter for a child index.
#[inline]
pub fn letter_of(index: usize) -> u8 {
    debug_assert!(index < ALPHABET);
    b'a' + index as u8
}
