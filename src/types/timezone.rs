//! Time zones, UTC offsets and the offset table.
//!
//! ## Offsets
//!
//! [`UtcOffset`] is a signed number of minutes parsed from the
//! `UTC±H[:MM]` notation. Minutes must be `00`, `30` or `45`, and hours
//! stay within `-12..=14`.
//!
//! ## Catalog
//!
//! [`TimezoneCatalog`] is the offset table the time-zone collaborator
//! provides. The core never fetches it; [`TimezoneCatalog::fallback`]
//! is the built-in table used when no provider is available.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClockError;
use crate::types::TimeOfDay;

// ============================================================================
// UtcOffset
// ============================================================================

/// Offset from UTC in minutes.
///
/// ```
/// use clock_ring::types::UtcOffset;
///
/// let delhi: UtcOffset = "UTC+5:30".parse().unwrap();
/// assert_eq!(delhi.minutes(), 330);
/// assert_eq!(delhi.to_string(), "UTC+5:30");
///
/// let bogota: UtcOffset = "utc-5".parse().unwrap();
/// assert_eq!(bogota.to_string(), "UTC-5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcOffset(i16);

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset(0);

    /// Build from signed minutes, `None` outside `-12:00..=+14:00`
    pub fn from_minutes(minutes: i16) -> Option<Self> {
        (-12 * 60..=14 * 60).contains(&minutes).then_some(UtcOffset(minutes))
    }

    #[inline]
    pub fn minutes(self) -> i16 {
        self.0
    }

    /// Offset in fractional hours, e.g. `5.5` for `UTC+5:30`
    pub fn hours(self) -> f64 {
        f64::from(self.0) / 60.0
    }

    /// Local wall-clock time for a UTC time of day
    pub fn apply(self, utc: TimeOfDay) -> TimeOfDay {
        utc.add_minutes(i32::from(self.0))
    }

    /// Short description relative to UTC
    pub fn describe(self) -> String {
        let hours = self.hours().abs();
        match self.0.signum() {
            0 => "UTC (no difference)".to_string(),
            1 => format!("{hours} hours ahead of UTC"),
            _ => format!("{hours} hours behind UTC"),
        }
    }
}

impl FromStr for UtcOffset {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClockError::InvalidOffset(s.to_string());

        let upper = s.trim().to_ascii_uppercase();
        let rest = upper.strip_prefix("UTC").ok_or_else(invalid)?;
        let (sign, rest) = match rest.as_bytes().first() {
            Some(b'+') => (1, &rest[1..]),
            Some(b'-') => (-1, &rest[1..]),
            _ => return Err(invalid()),
        };

        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None => (rest, "00"),
        };
        let numeric = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !numeric(hours, 2) || minutes.len() != 2 || !numeric(minutes, 2) {
            return Err(invalid());
        }

        let hours: i16 = hours.parse().map_err(|_| invalid())?;
        let minutes: i16 = minutes.parse().map_err(|_| invalid())?;
        if !matches!(minutes, 0 | 30 | 45) {
            return Err(invalid());
        }

        UtcOffset::from_minutes(sign * (hours * 60 + minutes)).ok_or_else(invalid)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        let (hours, minutes) = (abs / 60, abs % 60);
        if minutes == 0 {
            write!(f, "UTC{sign}{hours}")
        } else {
            write!(f, "UTC{sign}{hours}:{minutes:02}")
        }
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UtcOffset> for String {
    fn from(value: UtcOffset) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Timezone records
// ============================================================================

/// Build a stable id `country-city`: lowercase, spaces to `-`, common
/// accented letters folded to ASCII.
///
/// ```
/// use clock_ring::types::timezone_id;
///
/// assert_eq!(timezone_id("Colombia", "Bogotá"), "colombia-bogota");
/// assert_eq!(timezone_id("United States", "New York"), "united-states-new-york");
/// ```
pub fn timezone_id(country: &str, city: &str) -> String {
    fn slug(part: &str) -> String {
        part.trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                ' ' => '-',
                'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
                'é' | 'è' | 'ë' | 'ê' => 'e',
                'í' | 'ì' | 'ï' | 'î' => 'i',
                'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
                'ú' | 'ù' | 'ü' | 'û' => 'u',
                'ñ' => 'n',
                'ç' => 'c',
                other => other,
            })
            .collect()
    }
    format!("{}-{}", slug(country), slug(city))
}

/// A time zone offered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timezone {
    /// `country-city` id, see [`timezone_id`]
    pub id: String,
    pub country: String,
    pub city: String,
    pub offset: UtcOffset,
}

impl Timezone {
    /// Build a zone, deriving its id from country and city
    pub fn new(country: impl Into<String>, city: impl Into<String>, offset: UtcOffset) -> Self {
        let country = country.into();
        let city = city.into();
        Self {
            id: timezone_id(&country, &city),
            country,
            city,
            offset,
        }
    }

    /// `City, Country`
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// A time zone in the user's favorites, with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteTimezone {
    pub id: String,
    pub country: String,
    pub city: String,
    pub offset: UtcOffset,

    /// 0-based position in the favorites ring
    #[serde(default)]
    pub order: usize,
}

impl FavoriteTimezone {
    pub fn from_zone(zone: &Timezone, order: usize) -> Self {
        Self {
            id: zone.id.clone(),
            country: zone.country.clone(),
            city: zone.city.clone(),
            offset: zone.offset,
            order,
        }
    }

    /// Wall-clock time in this zone for a UTC time of day
    pub fn local_time(&self, utc: TimeOfDay) -> TimeOfDay {
        self.offset.apply(utc)
    }
}

// ============================================================================
// TimezoneCatalog
// ============================================================================

/// Built-in zones as `(country, city, offset minutes)`
const FALLBACK_ZONES: &[(&str, &str, i16)] = &[
    ("Colombia", "Bogotá", -300),
    ("United States", "New York", -300),
    ("United States", "Los Angeles", -480),
    ("United States", "Chicago", -360),
    ("Canada", "Toronto", -300),
    ("Mexico", "Mexico City", -360),
    ("Brazil", "São Paulo", -180),
    ("Argentina", "Buenos Aires", -180),
    ("Chile", "Santiago", -180),
    ("Peru", "Lima", -300),
    ("United Kingdom", "London", 0),
    ("France", "Paris", 60),
    ("Germany", "Berlin", 60),
    ("Spain", "Madrid", 60),
    ("Italy", "Rome", 60),
    ("Russia", "Moscow", 180),
    ("Netherlands", "Amsterdam", 60),
    ("Japan", "Tokyo", 540),
    ("China", "Beijing", 480),
    ("India", "New Delhi", 330),
    ("United Arab Emirates", "Dubai", 240),
    ("Australia", "Sydney", 600),
    ("New Zealand", "Auckland", 720),
    ("Egypt", "Cairo", 120),
    ("South Africa", "Johannesburg", 120),
];

/// The table of time zones a favorite can be chosen from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneCatalog {
    zones: Vec<Timezone>,
}

impl TimezoneCatalog {
    /// Catalog over the given zones; later duplicates of an id are dropped
    pub fn new(zones: impl IntoIterator<Item = Timezone>) -> Self {
        let mut catalog = Self { zones: Vec::new() };
        for zone in zones {
            if catalog.get(&zone.id).is_none() {
                catalog.zones.push(zone);
            }
        }
        catalog
    }

    /// The built-in table of 25 major cities
    pub fn fallback() -> Self {
        Self::new(FALLBACK_ZONES.iter().filter_map(|&(country, city, minutes)| {
            UtcOffset::from_minutes(minutes).map(|offset| Timezone::new(country, city, offset))
        }))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Timezone] {
        &self.zones
    }

    pub fn get(&self, id: &str) -> Option<&Timezone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// Zones whose country, city or id contains `query`, case-insensitive
    pub fn search(&self, query: &str) -> Vec<&Timezone> {
        let query = query.trim().to_lowercase();
        self.zones
            .iter()
            .filter(|zone| {
                zone.country.to_lowercase().contains(&query)
                    || zone.city.to_lowercase().contains(&query)
                    || zone.id.contains(&query)
            })
            .collect()
    }

    pub fn by_country(&self, country: &str) -> Vec<&Timezone> {
        self.zones
            .iter()
            .filter(|zone| zone.country.eq_ignore_ascii_case(country.trim()))
            .collect()
    }

    /// Distinct country names, sorted
    pub fn countries(&self) -> Vec<&str> {
        self.zones
            .iter()
            .map(|zone| zone.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_parse_valid() {
        let cases = [
            ("UTC+0", 0),
            ("UTC-5", -300),
            ("UTC+5:30", 330),
            ("UTC+5:45", 345),
            ("UTC-3:30", -210),
            ("UTC+14", 840),
            ("UTC-12", -720),
        ];
        for (text, minutes) in cases {
            assert_eq!(text.parse::<UtcOffset>().unwrap().minutes(), minutes, "{text}");
        }
    }

    #[test]
    fn test_offset_parse_invalid() {
        for bad in ["GMT+1", "UTC", "UTC5", "UTC+15", "UTC-13", "UTC+5:15", "UTC+5:3", "UTC+x"] {
            assert!(bad.parse::<UtcOffset>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_offset_display_roundtrip_and_describe() {
        let offset: UtcOffset = "UTC-3:30".parse().unwrap();

        assert_eq!(offset.to_string(), "UTC-3:30");
        assert_eq!(offset.describe(), "3.5 hours behind UTC");
        assert_eq!(UtcOffset::UTC.describe(), "UTC (no difference)");
        assert_eq!(UtcOffset::UTC.to_string(), "UTC+0");
    }

    #[test]
    fn test_offset_apply_wraps() {
        let tokyo = UtcOffset::from_minutes(540).unwrap();
        let utc = TimeOfDay::from_hm(20, 0).unwrap();

        assert_eq!(tokyo.apply(utc).to_string(), "05:00");
    }

    #[test]
    fn test_timezone_id_folds_accents() {
        assert_eq!(timezone_id("Brazil", "São Paulo"), "brazil-sao-paulo");
        assert_eq!(timezone_id(" España ", "Málaga"), "espana-malaga");
    }

    #[test]
    fn test_fallback_catalog() {
        let catalog = TimezoneCatalog::fallback();

        assert_eq!(catalog.len(), 25);
        let delhi = catalog.get("india-new-delhi").unwrap();
        assert_eq!(delhi.offset.to_string(), "UTC+5:30");
        assert_eq!(delhi.full_name(), "New Delhi, India");
    }

    #[test]
    fn test_catalog_queries() {
        let catalog = TimezoneCatalog::fallback();

        assert_eq!(catalog.by_country("united states").len(), 3);
        assert_eq!(catalog.search("york").len(), 1);
        assert_eq!(catalog.search("sao").len(), 1);

        let countries = catalog.countries();
        assert_eq!(countries.len(), 23);
        assert!(countries.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_catalog_drops_duplicate_ids() {
        let zone = Timezone::new("Peru", "Lima", UtcOffset::from_minutes(-300).unwrap());
        let catalog = TimezoneCatalog::new([zone.clone(), zone]);

        assert_eq!(catalog.len(), 1);
    }
}
