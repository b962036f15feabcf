//! # Clock Ring
//!
//! Ordered collections for a clock app, built on one circular doubly
//! linked list.
//!
//! ## Architecture
//!
//! - **Ring**: `CircularList<T>`, a slab arena of nodes linked by key
//! - **Types**: Alarm, Lap, time zone records and their value types
//! - **Collections**: alarm book (sorted by time), lap log (newest
//!   first), favorite zones (user order)
//! - **Store / App**: JSON record stores and the app that keeps the
//!   collections and their files in step
//!
//! ## Design Principles
//!
//! 1. **Wrap-around navigation**: next of the last element is the first
//! 2. **Stable keys**: nodes live in a `Slab`; links are `usize` keys
//! 3. **Exact durations**: lap times are fixed-point decimals, never floats
//! 4. **Synchronous**: no locking inside a collection; callers serialize
//!    access

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the ring, collections and stores
pub mod error;

/// Circular doubly linked list over a slab arena
pub mod ring;

/// Domain records: alarms, laps, time zones
pub mod types;

/// Ordering adapters: AlarmBook, LapLog, FavoriteZones
pub mod collections;

/// Record persistence and fingerprints
pub mod store;

/// Data directory and file layout
pub mod config;

/// Collections wired to their stores
pub mod app;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use app::{ClockApp, Stores};
pub use collections::{AlarmBook, FavoriteZones, LapLog};
pub use config::ClockConfig;
pub use error::{ClockError, ClockResult, ListError, StoreError};
pub use ring::{CircularList, Direction};
pub use types::{Alarm, AlarmDraft, AlarmPatch, FavoriteTimezone, Lap, TimeOfDay, Timezone, TimezoneCatalog, Weekday};
