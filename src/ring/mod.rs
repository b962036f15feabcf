//! Ring module: the circular doubly linked list backing every clock
//! collection.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: nodes live in a `slab::Slab`, linked by key
//! - **Head pointer**: the only entry point; `head.prev` is the last node
//! - **Predicate lookup**: elements are addressed by what they hold,
//!   never by node handle
//!
//! ## Components
//!
//! - [`RingNode`]: payload plus `next`/`prev` slab keys
//! - [`CircularList`]: the ring and its operations
//! - [`Direction`]: which neighbour navigation returns
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert at beginning / end | O(1) |
//! | Insert sorted | O(n) |
//! | Insert at position | O(n/2) |
//! | Delete by predicate | O(n) search + O(1) unlink |
//! | Next / previous | O(n) search + O(1) step |
//! | Size / is_empty | O(1) |
//!
//! ## Example
//!
//! ```
//! use clock_ring::ring::{CircularList, Direction};
//!
//! let mut laps = CircularList::new();
//! laps.insert_at_beginning("A");
//! laps.insert_at_beginning("B");
//! laps.insert_at_beginning("C");
//!
//! assert_eq!(laps.get_all(), vec!["C", "B", "A"]);
//! assert_eq!(laps.navigate(|lap| *lap == "A", Direction::Next), Ok(&"C"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ClockError;

pub mod node;
pub mod list;

pub use node::RingNode;
pub use list::{CircularList, Iter};

/// Navigation direction around the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow `next` links
    Next,
    /// Follow `prev` links
    Previous,
}

impl Direction {
    /// The opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Next => Direction::Previous,
            Direction::Previous => Direction::Next,
        }
    }
}

impl FromStr for Direction {
    type Err = ClockError;

    /// Accepts `next` and `prev` (or `previous`), case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" => Ok(Direction::Next),
            "prev" | "previous" => Ok(Direction::Previous),
            _ => Err(ClockError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Next => "next",
            Direction::Previous => "prev",
        })
    }
}
