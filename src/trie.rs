//! The concurrent word-frequency trie.
//!
//! Construction races any number of worker threads over one shared arena:
//! child edges are published by compare-and-swap with exactly one winner
//! per slot, and occurrence counts are relaxed atomic increments. After
//! the workers join, aggregation is a single-threaded pre-order walk in
//! ascending letter order, so the output comes out sorted.
//!
//! ## Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use wordtrie::WordTrie;
//!
//! let workers = NonZeroUsize::new(4).unwrap();
//! let trie = WordTrie::build(b"the cat sat on the mat", workers);
//! assert_eq!(
//!     trie.word_counts(),
//!     vec![
//!         ("cat".to_string(), 1),
//!         ("mat".to_string(), 1),
//!         ("on".to_string(), 1),
//!         ("sat".to_string(), 1),
//!         ("the".to_string(), 2),
//!     ],
//! );
//! ```

use std::num::NonZeroUsize;
use std::ops::Range;
use std::thread;

use smallvec::SmallVec;

use crate::alphabet::{letter_index, letter_of, ALPHABET};
use crate::arena::{NodeArena, NodeRef};
use crate::partition::partition_bounds;

/// Inline capacity of the traversal prefix buffer; longer words spill to
/// the heap.
const PREFIX_INLINE: usize = 24;

/// A word-frequency trie built concurrently and read single-threaded.
pub struct WordTrie {
    arena: NodeArena,
    root: NodeRef,
}

impl WordTrie {
    /// Build the trie over `text` with `workers` parallel builders,
    /// sizing the arena conservatively at one node per input byte plus
    /// one spare per worker plus the root.
    ///
    /// Returns only after every worker has finished. The result is
    /// identical for any worker count.
    pub fn build(text: &[u8], workers: NonZeroUsize) -> WordTrie {
        Self::build_with_capacity(text, workers, text.len() + workers.get() + 1)
    }

    /// Build with an explicit arena capacity, for callers that know their
    /// input's letter density.
    ///
    /// # Panics
    ///
    /// Panics if the arena runs out of nodes (see
    /// [`NodeArena::allocate`]). One node per letter byte plus one per
    /// worker plus the root is always enough.
    pub fn build_with_capacity(text: &[u8], workers: NonZeroUsize, capacity: usize) -> WordTrie {
        let arena = NodeArena::with_capacity(capacity);
        let root = arena.allocate();
        let workers = workers.get();
        thread::scope(|scope| {
            for rank in 0..workers {
                let arena = &arena;
                scope.spawn(move || {
                    let (begin, end) = partition_bounds(text, rank, workers);
                    build_partition(arena, root, text, begin..end);
                });
            }
        });
        WordTrie { arena, root }
    }

    /// Visit every counted word in strictly ascending lexicographic
    /// order.
    ///
    /// The word slice borrows the traversal's shared prefix buffer and is
    /// valid only for the duration of the call.
    pub fn for_each_word<F>(&self, mut visit: F)
    where
        F: FnMut(&[u8], u64),
    {
        // Pre-order over an explicit stack; children are pushed in reverse
        // so 'a' pops first. Each frame records the prefix length to
        // restore before appending its own letter.
        let mut prefix: SmallVec<[u8; PREFIX_INLINE]> = SmallVec::new();
        let mut stack: Vec<(NodeRef, u8, usize)> = Vec::with_capacity(64);
        push_children(&self.arena, self.root, 0, &mut stack);
        while let Some((node, letter, depth)) = stack.pop() {
            prefix.truncate(depth);
            prefix.push(letter);
            let entry = self.arena.node(node);
            let count = entry.count();
            if count > 0 {
                visit(&prefix, count);
            }
            push_children(&self.arena, node, depth + 1, &mut stack);
        }
    }

    /// All counted words with their occurrence totals, ascending.
    pub fn word_counts(&self) -> Vec<(String, u64)> {
        let mut pairs = Vec::new();
        self.for_each_word(|word, count| {
            let word: String = word.iter().map(|&byte| char::from(byte)).collect();
            pairs.push((word, count));
        });
        pairs
    }

    /// Nodes issued by the arena, including spares that were never linked
    /// in.
    pub fn allocated_nodes(&self) -> usize {
        self.arena.allocated()
    }

    /// The arena's fixed capacity.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }
}

/// Push `node`'s children onto the traversal stack, largest letter first.
#[inline]
fn push_children(
    arena: &NodeArena,
    node: NodeRef,
    depth: usize,
    stack: &mut Vec<(NodeRef, u8, usize)>,
) {
    let entry = arena.node(node);
    for letter in (0..ALPHABET).rev() {
        if let Some(child) = entry.child_relaxed(letter) {
            stack.push((child, letter_of(letter), depth));
        }
    }
}

/// Walk one partition, growing the shared trie and counting completed
/// words.
///
/// The builder holds at most one spare node: allocated at the first
/// vacant slot it meets, consumed by a successful publish, retained
/// across lost races.
fn build_partition(arena: &NodeArena, root: NodeRef, text: &[u8], range: Range<usize>) {
    debug_assert!(range.start <= range.end && range.end <= text.len());
    let mut current = root;
    let mut spare: Option<NodeRef> = None;
    for &byte in &text[range.clone()] {
        match letter_index(byte) {
            Some(letter) => {
                let entry = arena.node(current);
                current = match entry.child(letter) {
                    Some(next) => next,
                    None => {
                        let candidate = spare.take().unwrap_or_else(|| arena.allocate());
                        match entry.try_publish_child(letter, candidate) {
                            Ok(published) => published,
                            Err(winner) => {
                                spare = Some(candidate);
                                winner
                            }
                        }
                    }
                };
            }
            None => {
                if current != root {
                    arena.node(current).bump();
                    current = root;
                }
            }
        }
    }
    // A run pending at the partition's end is a complete word only if the
    // cut sits on a word boundary; a letter at the cut means a misaligned
    // partition, and the fragment is dropped.
    if current != root && word_boundary(text, range.end) {
        arena.node(current).bump();
    }
}

/// Whether `at` is a word boundary in `text`: the buffer edge or a
/// separator byte.
#[inline]
fn word_boundary(text: &[u8], at: usize) -> bool {
    at >= text.len() || letter_index(text[at]).is_none()
}
