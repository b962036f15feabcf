//! Error types for the ring and the clock collections.
//!
//! ## Layers
//!
//! - [`ListError`]: navigation failures of the raw ring (empty ring,
//!   no node matching the reference predicate)
//! - [`StoreError`]: I/O and JSON failures of a record store
//! - [`ClockError`]: everything the collection adapters and
//!   [`ClockApp`](crate::app::ClockApp) report to the API layer
//!
//! Inserts, `get_all` and `size` never fail and have no error type.

use thiserror::Error;

/// Navigation failure on a [`CircularList`](crate::ring::CircularList).
///
/// `Empty` and `NotFound` are kept distinct so callers can tell
/// "nothing to navigate" apart from "bad reference".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// The ring has no nodes
    #[error("list is empty")]
    Empty,

    /// No node matched the reference predicate
    #[error("reference element not found")]
    NotFound,
}

/// Failure reading or writing a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by the clock collections.
#[derive(Debug, Error)]
pub enum ClockError {
    /// A record referenced by id or number does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Navigation on a collection with no records
    #[error("{0} collection is empty")]
    EmptyCollection(&'static str),

    /// The largest id or number in a collection is already at its maximum
    #[error("no {0} left to assign")]
    IdExhausted(&'static str),

    #[error("time zone {0} is already a favorite")]
    AlreadyFavorite(String),

    #[error("invalid time of day '{0}', expected HH:MM in 00:00-23:59")]
    InvalidTime(String),

    #[error("invalid UTC offset '{0}', expected UTC±H or UTC±H:MM")]
    InvalidOffset(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("duplicate day {0}")]
    DuplicateDay(String),

    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),

    #[error("invalid direction '{0}', expected 'next' or 'prev'")]
    InvalidDirection(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias used across the collection adapters.
pub type ClockResult<T> = Result<T, ClockError>;

impl ClockError {
    /// Map a ring navigation failure onto a collection-level error.
    ///
    /// `collection` names the collection for `EmptyCollection`;
    /// `reference` describes the record for `NotFound`.
    pub fn from_list(err: ListError, collection: &'static str, reference: impl Into<String>) -> Self {
        match err {
            ListError::Empty => ClockError::EmptyCollection(collection),
            ListError::NotFound => ClockError::NotFound(reference.into()),
        }
    }

    /// True for the two "absent" outcomes the API layer maps to 404.
    pub fn is_absent(&self) -> bool {
        matches!(self, ClockError::NotFound(_) | ClockError::EmptyCollection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_keeps_kinds_distinct() {
        let empty = ClockError::from_list(ListError::Empty, "alarms", "alarm 3");
        let missing = ClockError::from_list(ListError::NotFound, "alarms", "alarm 3");

        assert!(matches!(empty, ClockError::EmptyCollection("alarms")));
        assert!(matches!(missing, ClockError::NotFound(ref s) if s == "alarm 3"));
        assert!(empty.is_absent());
        assert!(missing.is_absent());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ListError::Empty.to_string(), "list is empty");
        assert_eq!(
            ClockError::NotFound("lap 4".into()).to_string(),
            "lap 4 not found"
        );
        assert!(!ClockError::InvalidTime("25:00".into()).is_absent());
    }
}
