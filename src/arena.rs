//! Preallocated node pool and the atomic publication protocol.
//!
//! The pool is sized once up front and handed out by a single monotonic
//! cursor; nodes are never reclaimed or reused, so there is no ABA or
//! use-after-free surface to reason about. Handles are `u32` indices into
//! the pool with a reserved sentinel for "absent", stored directly in the
//! atomic child slots.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crate::alphabet::ALPHABET;

/// Bit pattern marking an empty child slot.
const VACANT: u32 = u32::MAX;

/// Handle to a node in a [`NodeArena`].
///
/// A plain index with no ownership semantics: the arena owns every node it
/// ever issues, for its whole lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeRef(u32);

impl NodeRef {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One trie node: 26 write-once child slots plus an occurrence counter.
///
/// A child slot transitions from vacant to occupied at most once, via
/// [`Node::try_publish_child`], and never changes afterwards. The counter
/// only grows.
pub struct Node {
    children: [AtomicU32; ALPHABET],
    count: AtomicU64,
}

impl Node {
    fn vacant() -> Self {
        Node {
            children: std::array::from_fn(|_| AtomicU32::new(VACANT)),
            count: AtomicU64::new(0),
        }
    }

    /// Read a child slot.
    ///
    /// Acquire, pairing with the release write in
    /// [`Node::try_publish_child`], so the child node's own fields are
    /// visible before the caller walks into it.
    #[inline]
    pub fn child(&self, letter: usize) -> Option<NodeRef> {
        decode(self.children[letter].load(Ordering::Acquire))
    }

    /// Read a child slot with relaxed ordering. Sound only once every
    /// writer has joined.
    #[inline]
    pub fn child_relaxed(&self, letter: usize) -> Option<NodeRef> {
        decode(self.children[letter].load(Ordering::Relaxed))
    }

    /// Try to install `candidate` as the child for `letter`.
    ///
    /// Exactly one caller can ever succeed per slot. Returns the slot's
    /// occupant either way: `Ok(candidate)` for the publisher, or
    /// `Err(winner)` with the concurrently installed node, read back with
    /// acquire ordering.
    #[inline]
    pub fn try_publish_child(&self, letter: usize, candidate: NodeRef) -> Result<NodeRef, NodeRef> {
        match self.children[letter].compare_exchange(
            VACANT,
            candidate.0,
            Ordering::Release,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(candidate),
            Err(winner) => Err(NodeRef(winner)),
        }
    }

    /// Record one occurrence of the word ending at this node.
    ///
    /// Relaxed: increments commute, and readers look only after the join
    /// barrier.
    #[inline]
    pub fn bump(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Occurrences of the word ending exactly at this node.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[inline]
fn decode(bits: u32) -> Option<NodeRef> {
    if bits == VACANT {
        None
    } else {
        Some(NodeRef(bits))
    }
}

/// Fixed-capacity pool of [`Node`]s with a single atomic bump cursor.
pub struct NodeArena {
    nodes: Box<[Node]>,
    cursor: AtomicUsize,
}

impl NodeArena {
    /// Preallocate a pool of `capacity` vacant nodes.
    ///
    /// Capacity is fixed for the arena's lifetime. One node per letter byte
    /// of the input, plus one per worker, plus the root, is always enough.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity < VACANT as usize,
            "arena capacity {capacity} exceeds the u32 handle range"
        );
        NodeArena {
            nodes: (0..capacity).map(|_| Node::vacant()).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Hand out the next vacant node.
    ///
    /// Callable from any number of threads; every call advances the cursor
    /// by exactly one, whether or not the node ends up linked into the
    /// trie.
    ///
    /// # Panics
    ///
    /// Panics when the pool is exhausted. There is no recovery path — a
    /// partially built structure cannot be repaired, so capacity is a
    /// sizing precondition, not a runtime condition.
    pub fn allocate(&self) -> NodeRef {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        if index >= self.nodes.len() {
            panic!(
                "NODE ARENA EXHAUSTED: all {} preallocated nodes issued",
                self.nodes.len()
            );
        }
        NodeRef(index as u32)
    }

    /// Access a node by handle.
    #[inline]
    pub fn node(&self, node: NodeRef) -> &Node {
        &self.nodes[node.index()]
    }

    /// Nodes issued so far, including any that lost a publish race and
    /// were never linked in.
    pub fn allocated(&self) -> usize {
        self.cursor.load(Ordering::Relaxed).min(self.nodes.len())
    }

    /// Total preallocated capacity.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_nodes_are_vacant() {
        let arena = NodeArena::with_capacity(4);
        let node = arena.allocate();
        for letter in 0..ALPHABET {
            assert_eq!(arena.node(node).child(letter), None);
            assert_eq!(arena.node(node).child_relaxed(letter), None);
        }
        assert_eq!(arena.node(node).count(), 0);
    }

    #[test]
    fn test_allocations_are_distinct() {
        let arena = NodeArena::with_capacity(100);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let node = arena.allocate();
            assert!(!seen.contains(&node));
            seen.push(node);
        }
        assert_eq!(arena.allocated(), 100);
        assert_eq!(arena.capacity(), 100);
    }

    #[test]
    fn test_concurrent_allocations_are_distinct() {
        let arena = NodeArena::with_capacity(8 * 1000);
        let mut issued: Vec<NodeRef> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| (0..1000).map(|_| arena.allocate()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });
        issued.sort_unstable_by_key(|node| node.0);
        issued.dedup();
        assert_eq!(issued.len(), 8 * 1000);
        assert_eq!(arena.allocated(), 8 * 1000);
    }

    #[test]
    fn test_publish_has_single_winner() {
        let arena = NodeArena::with_capacity(4);
        let parent = arena.allocate();
        let first = arena.allocate();
        let second = arena.allocate();

        assert_eq!(arena.node(parent).try_publish_child(3, first), Ok(first));
        assert_eq!(arena.node(parent).try_publish_child(3, second), Err(first));
        assert_eq!(arena.node(parent).child(3), Some(first));
    }

    #[test]
    fn test_count_accumulates() {
        let arena = NodeArena::with_capacity(1);
        let node = arena.allocate();
        arena.node(node).bump();
        arena.node(node).bump();
        assert_eq!(arena.node(node).count(), 2);
    }

    #[test]
    #[should_panic(expected = "NODE ARENA EXHAUSTED")]
    fn test_exhaustion_panics() {
        let arena = NodeArena::with_capacity(2);
        arena.allocate();
        arena.allocate();
        arena.allocate();
    }
}
