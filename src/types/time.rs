//! Time-of-day and weekday types.
//!
//! ## Representation
//!
//! [`TimeOfDay`] is stored as minutes since midnight (`0..1440`), so alarm
//! ordering is a plain integer comparison instead of a string compare on
//! `"HH:MM"`. The text form is only used at the serde boundary.
//!
//! ## Examples
//!
//! ```
//! use clock_ring::types::TimeOfDay;
//!
//! let t: TimeOfDay = "7:05".parse().unwrap();
//! assert_eq!(t.minutes(), 425);
//! assert_eq!(t.to_string(), "07:05");
//! assert_eq!(t.add_minutes(-430).to_string(), "23:55");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Minutes in one day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight, 00:00
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from hour and minute, `None` when out of range
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(TimeOfDay(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Build from minutes since midnight, `None` when `>= 1440`
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    /// Minutes since midnight
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    #[inline]
    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Shift by a signed number of minutes, wrapping around midnight
    pub fn add_minutes(self, delta: i32) -> Self {
        let day = i32::from(MINUTES_PER_DAY);
        let shifted = (i32::from(self.0) + delta).rem_euclid(day);
        TimeOfDay(shifted as u16)
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight
    ///
    /// ```
    /// use clock_ring::types::TimeOfDay;
    ///
    /// let late = TimeOfDay::from_hm(23, 30).unwrap();
    /// let early = TimeOfDay::from_hm(6, 0).unwrap();
    /// assert_eq!(late.minutes_until(early), 390);
    /// assert_eq!(early.minutes_until(early), 0);
    /// ```
    pub fn minutes_until(self, later: TimeOfDay) -> u16 {
        let day = i32::from(MINUTES_PER_DAY);
        (i32::from(later.0) - i32::from(self.0)).rem_euclid(day) as u16
    }

    /// 12-hour rendering, e.g. `"7:05 AM"`
    pub fn to_12h(self) -> String {
        let (hour, period) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{}:{:02} {}", hour, self.minute(), period)
    }
}

impl FromStr for TimeOfDay {
    type Err = ClockError;

    /// Accepts `H:MM` and `HH:MM` in `00:00..=23:59`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockError::InvalidTime(s.to_string());

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(hours, 2) || minutes.len() != 2 || !digits(minutes, 2) {
            return Err(invalid());
        }

        let hour: u8 = hours.parse().map_err(|_| invalid())?;
        let minute: u8 = minutes.parse().map_err(|_| invalid())?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

// ============================================================================
// Weekday
// ============================================================================

/// Day of the week an alarm repeats on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Monday through Sunday
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Monday through Friday
    pub const WORKDAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl FromStr for Weekday {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClockError::InvalidWeekday(s.to_string()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_times() {
        assert_eq!("00:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::MIDNIGHT);
        assert_eq!("7:30".parse::<TimeOfDay>().unwrap().minutes(), 450);
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().minutes(), 1439);
    }

    #[test]
    fn test_parse_invalid_times() {
        for bad in ["24:00", "12:60", "7:5", "0730", "", "ab:cd", "-1:30", "123:00", "12:345"] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(ClockError::InvalidTime(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_ordering_is_numeric() {
        let nine: TimeOfDay = "9:00".parse().unwrap();
        let ten: TimeOfDay = "10:00".parse().unwrap();

        // "9:00" > "10:00" as strings, but not as times
        assert!(nine < ten);
    }

    #[test]
    fn test_add_minutes_wraps() {
        let t = TimeOfDay::from_hm(23, 0).unwrap();

        assert_eq!(t.add_minutes(90).to_string(), "00:30");
        assert_eq!(t.add_minutes(-24 * 60).to_string(), "23:00");
        assert_eq!(TimeOfDay::MIDNIGHT.add_minutes(-1).to_string(), "23:59");
    }

    #[test]
    fn test_twelve_hour_format() {
        assert_eq!(TimeOfDay::MIDNIGHT.to_12h(), "12:00 AM");
        assert_eq!(TimeOfDay::from_hm(12, 5).unwrap().to_12h(), "12:05 PM");
        assert_eq!(TimeOfDay::from_hm(18, 45).unwrap().to_12h(), "6:45 PM");
    }

    #[test]
    fn test_serde_as_string() {
        let t = TimeOfDay::from_hm(6, 0).unwrap();
        let json = serde_json::to_string(&t).unwrap();

        assert_eq!(json, "\"06:00\"");
        assert_eq!(serde_json::from_str::<TimeOfDay>(&json).unwrap(), t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!("mon".parse::<Weekday>().unwrap(), Weekday::Mon);
        assert!("Funday".parse::<Weekday>().is_err());
        assert!(Weekday::Sun.is_weekend());
        assert!(!Weekday::Fri.is_weekend());
    }
}
