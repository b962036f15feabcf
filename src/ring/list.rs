//! Circular doubly linked list over a slab arena.
//!
//! ## Design
//!
//! All nodes live in one `Slab<RingNode<T>>`; the list itself only
//! records which key is the head. Relinking is O(1) once a key is known,
//! and the slab's free list recycles the keys of deleted nodes.
//!
//! ## Ring Structure
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   ↓                                              │
//! head <-> node1 <-> node2 <-> ... <-> last ───────┘
//!   └───────────────── prev ────────────→ last
//! ```
//!
//! - `head.prev` is the last node; `last.next` is the head
//! - a one-element ring is a node linked to itself
//! - an empty ring has no head
//!
//! ## Lookup
//!
//! Every operation that names an element does so with a predicate on
//! the payload, resolved by [`CircularList::find_key`]. Keys are never
//! handed out, so nothing outside the list can hold a stale node.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::iter::FusedIterator;

use slab::Slab;

use crate::error::ListError;
use crate::ring::{Direction, RingNode};

/// Circular doubly linked list.
///
/// ## Example
///
/// ```
/// use clock_ring::ring::CircularList;
///
/// let mut list = CircularList::new();
/// list.insert_at_end(2);
/// list.insert_at_end(3);
/// list.insert_at_beginning(1);
///
/// assert_eq!(list.get_all(), vec![1, 2, 3]);
/// assert_eq!(list.get_next(|v| *v == 3), Ok(&1)); // wraps
/// assert_eq!(list.get_previous(|v| *v == 1), Ok(&3));
/// ```
#[derive(Clone)]
pub struct CircularList<T> {
    /// Node storage
    /// Key: slab index, Value: RingNode
    nodes: Slab<RingNode<T>>,

    /// Entry point of the ring, None when empty
    head: Option<usize>,
}

impl<T> Default for CircularList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CircularList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            head: None,
        }
    }

    /// Create an empty list with room for `capacity` nodes
    ///
    /// ```
    /// use clock_ring::ring::CircularList;
    ///
    /// let list = CircularList::<u32>::with_capacity(128);
    /// assert!(list.capacity() >= 128);
    /// assert!(list.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            head: None,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of elements in the ring
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Alias of [`size`](Self::size)
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Slots pre-allocated in the arena
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `value` as the new head. O(1).
    pub fn insert_at_beginning(&mut self, value: T) {
        let key = self.alloc(value);
        if let Some(head) = self.head {
            self.link_before(key, head);
        }
        self.head = Some(key);
    }

    /// Insert `value` at the last position (just before head). O(1).
    ///
    /// The head does not move unless the list was empty.
    pub fn insert_at_end(&mut self, value: T) {
        let key = self.alloc(value);
        match self.head {
            Some(head) => self.link_before(key, head),
            None => self.head = Some(key),
        }
    }

    /// Insert `value` keeping the ring ordered by `key_fn`. O(n).
    ///
    /// The value goes in front of the first element whose key is greater
    /// than its own, so equal keys keep insertion order.
    ///
    /// ```
    /// use clock_ring::ring::CircularList;
    ///
    /// let mut list = CircularList::new();
    /// for (time, tag) in [(730, 'a'), (600, 'b'), (730, 'c'), (915, 'd')] {
    ///     list.insert_sorted((time, tag), |entry| entry.0);
    /// }
    ///
    /// let tags: Vec<char> = list.iter().map(|entry| entry.1).collect();
    /// assert_eq!(tags, vec!['b', 'a', 'c', 'd']);
    /// ```
    pub fn insert_sorted<K, F>(&mut self, value: T, mut key_fn: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let new_key = key_fn(&value);
        self.insert_sorted_by(value, |existing, _| key_fn(existing).cmp(&new_key));
    }

    /// Insert `value` keeping the ring ordered by `compare`. O(n).
    ///
    /// `compare(existing, new)` is evaluated from head onwards; the value
    /// is placed before the first element for which it returns
    /// `Ordering::Greater`, or at the end if there is none.
    pub fn insert_sorted_by<F>(&mut self, value: T, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let Some(head) = self.head else {
            self.insert_at_end(value);
            return;
        };

        let mut position = None;
        let mut cursor = head;
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[cursor];
            if compare(&node.value, &value) == Ordering::Greater {
                position = Some(cursor);
                break;
            }
            cursor = node.next;
        }

        let key = self.alloc(value);
        match position {
            Some(at) => {
                self.link_before(key, at);
                if at == head {
                    self.head = Some(key);
                }
            }
            None => self.link_before(key, head),
        }
    }

    /// Insert `value` so that it ends up at ring position `position`.
    ///
    /// Positions past the end are clamped to the end. The walk to the
    /// target node starts from whichever end of the ring is closer.
    ///
    /// ```
    /// use clock_ring::ring::CircularList;
    ///
    /// let mut list: CircularList<_> = ["f1", "f2", "f3"].into_iter().collect();
    /// list.insert_at(1, "new");
    /// list.insert_at(99, "tail");
    ///
    /// assert_eq!(list.get_all(), vec!["f1", "new", "f2", "f3", "tail"]);
    /// ```
    pub fn insert_at(&mut self, position: usize, value: T) {
        let len = self.nodes.len();
        if position == 0 {
            self.insert_at_beginning(value);
        } else if position >= len {
            self.insert_at_end(value);
        } else {
            let at = self.key_at(position);
            let key = self.alloc(value);
            self.link_before(key, at);
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Remove the first element (in ring order from head) matching
    /// `predicate`, returning it.
    ///
    /// Returns `None` when nothing matches, including on an empty list.
    pub fn delete<P>(&mut self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let key = self.find_key(predicate)?;
        Some(self.unlink(key))
    }

    /// Remove every element matching `predicate`, returning how many
    /// were removed.
    pub fn delete_all<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let doomed: Vec<usize> = self
            .keys()
            .filter(|&key| predicate(&self.nodes[key].value))
            .collect();

        for &key in &doomed {
            self.unlink(key);
        }
        doomed.len()
    }

    /// Destroy every node and reset to the empty state
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// First element matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.find_key(predicate).map(|key| &self.nodes[key].value)
    }

    /// Mutable access to the first element matching `predicate`.
    ///
    /// The ring is not re-sorted afterwards; changing a field the ring is
    /// ordered by leaves it out of order. Delete and reinsert instead.
    pub fn find_mut<P>(&mut self, predicate: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let key = self.find_key(predicate)?;
        Some(&mut self.nodes[key].value)
    }

    /// Every element matching `predicate`, in ring order
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|value| predicate(value)).cloned().collect()
    }

    /// Whether any element matches `predicate`
    pub fn contains<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find_key(predicate).is_some()
    }

    /// Payload at head
    pub fn first(&self) -> Option<&T> {
        self.head.map(|head| &self.nodes[head].value)
    }

    /// Payload just before head
    pub fn last(&self) -> Option<&T> {
        self.head.map(|head| &self.nodes[self.nodes[head].prev].value)
    }

    // ========================================================================
    // Circular Navigation
    // ========================================================================

    /// Payload following the element matching `reference`, wrapping
    /// from the last element to head.
    ///
    /// # Errors
    ///
    /// * `ListError::Empty` - the ring has no nodes
    /// * `ListError::NotFound` - no element matches `reference`
    pub fn get_next<P>(&self, reference: P) -> Result<&T, ListError>
    where
        P: FnMut(&T) -> bool,
    {
        self.navigate(reference, Direction::Next)
    }

    /// Payload preceding the element matching `reference`, wrapping
    /// from head to the last element.
    ///
    /// Errors as for [`get_next`](Self::get_next).
    pub fn get_previous<P>(&self, reference: P) -> Result<&T, ListError>
    where
        P: FnMut(&T) -> bool,
    {
        self.navigate(reference, Direction::Previous)
    }

    /// [`get_next`](Self::get_next) or [`get_previous`](Self::get_previous)
    /// depending on `direction`.
    pub fn navigate<P>(&self, reference: P, direction: Direction) -> Result<&T, ListError>
    where
        P: FnMut(&T) -> bool,
    {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let key = self.find_key(reference).ok_or(ListError::NotFound)?;
        let node = &self.nodes[key];
        let neighbour = match direction {
            Direction::Next => node.next,
            Direction::Previous => node.prev,
        };
        Ok(&self.nodes[neighbour].value)
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// All payloads in ring order starting from head
    pub fn get_all(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// All payloads in reverse ring order starting from the last element
    pub fn get_all_reverse(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().rev().cloned().collect()
    }

    /// Borrowing iterator over one lap of the ring, starting at head.
    ///
    /// Unlike navigation, iteration is not cyclic: it yields exactly
    /// `size()` items and then stops.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.head.map(|head| self.nodes[head].prev),
            remaining: self.nodes.len(),
        }
    }

    /// Visit every payload mutably in ring order, passing its position.
    ///
    /// Links cannot be touched from here, only payloads. Callers that
    /// change a field the ring is sorted by must delete and reinsert
    /// instead.
    pub fn update_each<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &mut T),
    {
        let keys: Vec<usize> = self.keys().collect();
        for (position, key) in keys.into_iter().enumerate() {
            f(position, &mut self.nodes[key].value);
        }
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Verify closure and link symmetry of the whole ring.
    ///
    /// Walks `next` from head exactly `size()` times and checks that it
    /// arrives back at head, that every step is mirrored by `prev`, and
    /// that the walk visited every node in the arena.
    pub fn verify_links(&self) -> bool {
        let Some(head) = self.head else {
            return self.nodes.is_empty();
        };

        let len = self.nodes.len();
        let mut seen = Vec::with_capacity(len);
        let mut cursor = head;
        for _ in 0..len {
            let Some(node) = self.nodes.get(cursor) else {
                return false;
            };
            match self.nodes.get(node.next) {
                Some(next) if next.prev == cursor => {}
                _ => return false,
            }
            match self.nodes.get(node.prev) {
                Some(prev) if prev.next == cursor => {}
                _ => return false,
            }
            seen.push(cursor);
            cursor = node.next;
        }

        seen.sort_unstable();
        seen.dedup();
        cursor == head && seen.len() == len
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Slab key of the first node matching `predicate`, walking from head
    fn find_key<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.keys().find(|&key| predicate(&self.nodes[key].value))
    }

    /// Iterator over slab keys in ring order
    fn keys(&self) -> Keys<'_, T> {
        Keys {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Key of the node at ring position `position` (< len), walking from
    /// the nearer end
    fn key_at(&self, position: usize) -> usize {
        let len = self.nodes.len();
        let head = self.head.unwrap_or_default();
        if position <= len / 2 {
            let mut cursor = head;
            for _ in 0..position {
                cursor = self.nodes[cursor].next;
            }
            cursor
        } else {
            let mut cursor = self.nodes[head].prev;
            for _ in 0..(len - 1 - position) {
                cursor = self.nodes[cursor].prev;
            }
            cursor
        }
    }

    /// Store `value` in a fresh self-linked node and return its key
    fn alloc(&mut self, value: T) -> usize {
        let entry = self.nodes.vacant_entry();
        let key = entry.key();
        entry.insert(RingNode::new(value, key));
        key
    }

    /// Splice the self-linked node `key` in immediately before `at`
    fn link_before(&mut self, key: usize, at: usize) {
        let prev = self.nodes[at].prev;

        let node = &mut self.nodes[key];
        node.prev = prev;
        node.next = at;

        self.nodes[prev].next = key;
        self.nodes[at].prev = key;
    }

    /// Remove node `key` from the ring and the arena
    fn unlink(&mut self, key: usize) -> T {
        let node = self.nodes.remove(key);

        if node.is_self_linked(key) {
            self.head = None;
        } else {
            self.nodes[node.prev].next = node.next;
            self.nodes[node.next].prev = node.prev;
            if self.head == Some(key) {
                self.head = Some(node.next);
            }
        }

        node.into_value()
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Key walker used by lookup and bulk operations
struct Keys<'a, T> {
    nodes: &'a Slab<RingNode<T>>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<T> Iterator for Keys<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.cursor?;
        self.remaining -= 1;
        self.cursor = Some(self.nodes[key].next);
        Some(key)
    }
}

/// Borrowing iterator over a [`CircularList`], see [`CircularList::iter`]
pub struct Iter<'a, T> {
    list: &'a CircularList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.front?];
        self.remaining -= 1;
        self.front = Some(node.next);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.nodes[self.back?];
        self.remaining -= 1;
        self.back = Some(node.prev);
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a CircularList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ============================================================================
// Construction and formatting
// ============================================================================

impl<T> FromIterator<T> for CircularList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for CircularList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_at_end(value);
        }
    }
}

impl<T: Debug> Debug for CircularList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Display> Display for CircularList<T> {
    /// Renders as `[a <-> b <-> c ⟲]`
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" <-> ")?;
            }
            write!(f, "{value}")?;
        }
        if !self.is_empty() {
            f.write_str(" ⟲")?;
        }
        f.write_str("]")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
