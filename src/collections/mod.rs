//! Ordering adapters over [`CircularList`](crate::ring::CircularList)
//!
//! Each adapter owns one ring and fixes its insertion policy:
//!
//! | Collection        | Insertion              | Enumeration order       |
//! |-------------------|------------------------|-------------------------|
//! | [`AlarmBook`]     | `insert_sorted` (time) | earliest time first     |
//! | [`LapLog`]        | `insert_at_beginning`  | newest lap first        |
//! | [`FavoriteZones`] | `insert_at_end`        | user order, reorderable |
//!
//! Records are always re-resolved by id; no adapter hands out or keeps
//! arena keys.

mod alarms;
mod favorites;
mod laps;

pub use alarms::AlarmBook;
pub use favorites::FavoriteZones;
pub use laps::LapLog;
