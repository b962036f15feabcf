//! Domain records for the clock collections
//!
//! Every record derives serde `Serialize`/`Deserialize` so the API layer
//! and the record stores can exchange them without extra mapping.
//!
//! ## Types
//!
//! - [`TimeOfDay`]: minute-precision wall-clock time, the alarm sort key
//! - [`Weekday`]: repeat days of an alarm
//! - [`Alarm`], [`AlarmDraft`], [`AlarmPatch`]: alarm record and its
//!   create/update payloads
//! - [`Lap`], [`LapStatistics`], [`Pace`]: stopwatch laps
//! - [`UtcOffset`], [`Timezone`], [`FavoriteTimezone`],
//!   [`TimezoneCatalog`]: time zones and the offset table
//!
//! ## Fixed-Point Durations
//!
//! Lap times are `rust_decimal::Decimal` seconds rounded to hundredths.
//! See [`seconds`].

mod time;
mod alarm;
mod lap;
mod timezone;
pub mod seconds;

pub use time::{TimeOfDay, Weekday, MINUTES_PER_DAY};
pub use alarm::{validate_days, validate_label, Alarm, AlarmDraft, AlarmPatch, DEFAULT_LABEL, MAX_LABEL_LEN};
pub use lap::{Lap, LapStatistics, Pace};
pub use timezone::{timezone_id, FavoriteTimezone, Timezone, TimezoneCatalog, UtcOffset};
