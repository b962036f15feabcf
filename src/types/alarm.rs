//! Alarm records.
//!
//! An [`Alarm`] is what the alarm collection stores and the API layer
//! serializes. [`AlarmDraft`] carries the fields a client supplies on
//! create; [`AlarmPatch`] carries the optional fields of an update.

use serde::{Deserialize, Serialize};

use crate::error::{ClockError, ClockResult};
use crate::types::{TimeOfDay, Weekday};

/// Longest label accepted, in characters
pub const MAX_LABEL_LEN: usize = 100;

/// Label used when a draft does not provide one
pub const DEFAULT_LABEL: &str = "New Alarm";

/// A scheduled alarm.
///
/// ## Example
///
/// ```
/// use clock_ring::types::{Alarm, TimeOfDay, Weekday};
///
/// let alarm = Alarm {
///     id: 1,
///     time: TimeOfDay::from_hm(7, 30).unwrap(),
///     label: "Wake up".to_string(),
///     enabled: true,
///     days: Weekday::WORKDAYS.to_vec(),
///     created_at: 1_760_000_000_000,
/// };
///
/// assert!(alarm.is_repeating());
/// assert_eq!(alarm.days_label(), "Weekdays");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Unique alarm identifier (assigned by the collection)
    pub id: u64,

    /// Time of day the alarm rings; the collection's sort key
    pub time: TimeOfDay,

    pub label: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Days the alarm repeats on; empty means a one-off alarm
    #[serde(default)]
    pub days: Vec<Weekday>,

    /// Creation timestamp in milliseconds since the Unix epoch
    #[serde(default)]
    pub created_at: u64,
}

fn default_enabled() -> bool {
    true
}

impl Alarm {
    /// Whether the alarm repeats on any day
    pub fn is_repeating(&self) -> bool {
        !self.days.is_empty()
    }

    pub fn is_daily(&self) -> bool {
        Weekday::ALL.iter().all(|day| self.days.contains(day))
    }

    pub fn is_workdays(&self) -> bool {
        self.days.len() == Weekday::WORKDAYS.len()
            && Weekday::WORKDAYS.iter().all(|day| self.days.contains(day))
    }

    pub fn is_weekend(&self) -> bool {
        self.days.len() == 2 && self.days.iter().all(|day| day.is_weekend())
    }

    /// Whether the alarm rings on `day`; one-off alarms ring on any day
    pub fn rings_on(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    /// Human-readable repeat description
    pub fn days_label(&self) -> String {
        if self.is_daily() {
            "Daily".to_string()
        } else if self.is_workdays() {
            "Weekdays".to_string()
        } else if self.is_weekend() {
            "Weekend".to_string()
        } else if self.days.is_empty() {
            "Once".to_string()
        } else {
            self.days
                .iter()
                .map(|day| day.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Fields supplied when creating an alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmDraft {
    pub time: TimeOfDay,

    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub days: Vec<Weekday>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

impl AlarmDraft {
    /// Enabled, one-off draft with the default label
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            time,
            label: default_label(),
            enabled: true,
            days: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Optional fields of an alarm update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPatch {
    #[serde(default)]
    pub time: Option<TimeOfDay>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub days: Option<Vec<Weekday>>,
}

impl AlarmPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.label.is_none() && self.enabled.is_none() && self.days.is_none()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Trim a label and check it is non-empty and at most [`MAX_LABEL_LEN`]
/// characters.
pub fn validate_label(label: &str) -> ClockResult<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ClockError::InvalidLabel("label cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(ClockError::InvalidLabel(format!(
            "label exceeds {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject repeated days; order is kept as given.
pub fn validate_days(days: &[Weekday]) -> ClockResult<()> {
    for (i, day) in days.iter().enumerate() {
        if days[..i].contains(day) {
            return Err(ClockError::DuplicateDay(day.to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
