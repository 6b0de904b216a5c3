//! # wordtrie
//!
//! A lock-free concurrent trie for counting word frequencies over a large
//! text buffer.
//!
//! Worker threads each own a contiguous, word-aligned slice of the input
//! and race to grow one shared trie: child edges are published by
//! compare-and-swap with exactly one winner per slot, nodes come from a
//! preallocated arena that never reclaims, and occurrence counts are
//! relaxed atomic increments. After the workers join, a single-threaded
//! traversal yields every (word, count) pair in lexicographic order.
//!
//! Bytes `a-z`/`A-Z` are letters (case folded together); every other byte
//! separates words.
//!
//! ## Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use wordtrie::WordTrie;
//!
//! let workers = NonZeroUsize::new(4).unwrap();
//! let trie = WordTrie::build(b"the cat sat on the mat", workers);
//! let pairs = trie.word_counts();
//! assert_eq!(pairs[0], ("cat".to_string(), 1));
//! assert_eq!(pairs[4], ("the".to_string(), 2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alphabet;
pub mod arena;
pub mod partition;
pub mod timing;
pub mod trie;

pub use arena::{Node, NodeArena, NodeRef};
pub use partition::partition_bounds;
pub use timing::Stopwatch;
pub use trie::WordTrie;

#[cfg(test)]
mod proptests;
