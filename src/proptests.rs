use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// Naive single-threaded counter used as the oracle: split on non-letters,
/// fold case, count into an ordered map.
fn reference_counts(text: &[u8]) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut word = String::new();
    for &byte in text {
        match alphabet::letter_index(byte) {
            Some(letter) => word.push(char::from(alphabet::letter_of(letter))),
            None => {
                if !word.is_empty() {
                    *counts.entry(std::mem::take(&mut word)).or_insert(0) += 1;
                }
            }
        }
    }
    if !word.is_empty() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn workers(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn matches_reference_on_text(
        text in "[a-zA-Z \\n\\t.,;:!?0-9']{0,800}",
        n in 1..=16usize,
    ) {
        let trie = WordTrie::build(text.as_bytes(), workers(n));
        prop_assert_eq!(trie.word_counts(), reference_counts(text.as_bytes()));
    }

    #[test]
    fn matches_reference_on_raw_bytes(
        text in prop::collection::vec(any::<u8>(), 0..=2048),
        n in 1..=8usize,
    ) {
        let trie = WordTrie::build(&text, workers(n));
        prop_assert_eq!(trie.word_counts(), reference_counts(&text));
    }

    #[test]
    fn partitions_tile(
        text in prop::collection::vec(any::<u8>(), 0..=2048),
        n in 1..=32usize,
    ) {
        let mut expected_begin = 0;
        for rank in 0..n {
            let (begin, end) = partition_bounds(&text, rank, n);
            prop_assert_eq!(begin, expected_begin);
            prop_assert!(begin <= end);
            if begin != 0 && begin != text.len() {
                // Interior cuts sit on separator bytes.
                prop_assert!(alphabet::letter_index(text[begin]).is_none());
            }
            expected_begin = end;
        }
        prop_assert_eq!(expected_begin, text.len());
    }

    #[test]
    fn allocations_stay_bounded(
        text in "[a-z ]{0,600}",
        n in 1..=16usize,
    ) {
        let letters = text.bytes().filter(u8::is_ascii_alphabetic).count();
        let trie = WordTrie::build(text.as_bytes(), workers(n));
        prop_assert!(trie.allocated_nodes() <= letters + n + 1);
    }
}

/// Exhaustively cross-check every `{a, b, space}` string up to length 6
/// against the oracle at several worker counts, covering all the small
/// boundary placements.
#[test]
fn exhaustive_small_inputs() {
    let symbols = [b'a', b'b', b' '];
    for len in 0..=6u32 {
        for mut code in 0..symbols.len().pow(len) {
            let mut text = Vec::with_capacity(len as usize);
            for _ in 0..len {
                text.push(symbols[code % symbols.len()]);
                code /= symbols.len();
            }
            let expected = reference_counts(&text);
            for n in [1, 2, 3, 5] {
                let trie = WordTrie::build(&text, workers(n));
                assert_eq!(
                    trie.word_counts(),
                    expected,
                    "text {:?}, {} workers",
                    String::from_utf8_lossy(&text),
                    n
                );
            }
        }
    }
}
