//! Ring node for slab-based storage.
//!
//! ## Design
//!
//! `RingNode` wraps one payload with the slab keys of its two neighbours.
//! Links are plain `usize` keys, never references, so the `prev` back
//! link is lookup-only and no ownership cycle exists: the slab owns
//! every node, the ring only describes an order over them.
//!
//! ## Slab Integration
//!
//! Per official slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values handed out by `VacantEntry::key()`
//! - Keys are reused after `slab.remove()` (the slab keeps a free list)
//! - O(1) insert, remove, and lookup
//!
//! ## Self Links
//!
//! A node is created already linked to itself, which is exactly the
//! shape of a one-element ring. Splicing it into a larger ring rewrites
//! both links.

/// Node stored in the ring's slab.
///
/// ```text
/// RingNode {
///     value: T
///     next: usize   (slab key of the following node)
///     prev: usize   (slab key of the preceding node)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RingNode<T> {
    /// The payload
    pub value: T,

    /// Next node in ring order (slab key)
    pub next: usize,

    /// Previous node in ring order (slab key)
    pub prev: usize,
}

impl<T> RingNode<T> {
    /// Create a node that links to itself.
    ///
    /// # Arguments
    ///
    /// * `value` - The payload to wrap
    /// * `key` - The slab key this node will be stored under
    ///
    /// # Example
    ///
    /// ```
    /// use clock_ring::ring::RingNode;
    ///
    /// let node = RingNode::new("07:30", 4);
    ///
    /// assert_eq!(node.next, 4);
    /// assert_eq!(node.prev, 4);
    /// assert!(node.is_self_linked(4));
    /// ```
    #[inline]
    pub fn new(value: T, key: usize) -> Self {
        Self {
            value,
            next: key,
            prev: key,
        }
    }

    /// Check whether both links point back at `key` (a one-node ring)
    #[inline]
    pub fn is_self_linked(&self, key: usize) -> bool {
        self.next == key && self.prev == key
    }

    /// Borrow the payload
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the node, returning its payload
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
