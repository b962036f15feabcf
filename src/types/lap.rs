//! Stopwatch lap records.
//!
//! `lap_time` is the duration of the lap itself; `total_time` is the
//! stopwatch reading when the lap was taken. Both are decimal seconds
//! rounded to hundredths (see [`seconds`](crate::types::seconds)).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::seconds::format_clock;

/// A recorded lap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    /// Unique lap identifier (assigned by the collection)
    pub id: u64,

    /// 1-based lap counter, increasing with every lap taken
    pub lap_number: u32,

    /// Duration of this lap in seconds
    pub lap_time: Decimal,

    /// Stopwatch reading when the lap was taken, in seconds
    pub total_time: Decimal,

    /// Capture timestamp in milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: u64,
}

impl Lap {
    /// `lap_time` as `MM:SS.ss`
    pub fn format_lap_time(&self) -> String {
        format_clock(self.lap_time)
    }

    /// `total_time` as `MM:SS.ss`
    pub fn format_total_time(&self) -> String {
        format_clock(self.total_time)
    }

    pub fn pace(&self) -> Pace {
        Pace::of(self.lap_time)
    }
}

/// Coarse speed bucket of a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    /// Under 10 seconds
    VeryFast,
    /// 10 to 30 seconds
    Fast,
    /// 30 to 60 seconds
    Normal,
    /// A minute or more
    Slow,
}

impl Pace {
    pub fn of(lap_time: Decimal) -> Self {
        if lap_time < Decimal::TEN {
            Pace::VeryFast
        } else if lap_time < Decimal::from(30) {
            Pace::Fast
        } else if lap_time < Decimal::from(60) {
            Pace::Normal
        } else {
            Pace::Slow
        }
    }
}

/// Summary of every lap in the log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LapStatistics {
    pub total_laps: usize,
    pub fastest_lap: Option<Lap>,
    pub slowest_lap: Option<Lap>,

    /// Mean lap duration, rounded to hundredths
    pub average_lap_time: Decimal,

    /// Stopwatch reading at the most recent lap (not a sum of laps)
    pub total_elapsed_time: Decimal,
}

impl LapStatistics {
    pub fn format_average_time(&self) -> String {
        format_clock(self.average_lap_time)
    }

    pub fn format_total_time(&self) -> String {
        format_clock(self.total_elapsed_time)
    }
}
