//! Alarm collection: a ring kept sorted by time of day.
//!
//! ## Policy
//!
//! Every alarm enters through `insert_sorted` keyed by [`TimeOfDay`], so
//! `all()` is always in ring order from the earliest alarm. Any update
//! that may move the sort key is a delete followed by a fresh sorted
//! insert, never an in-place edit.
//!
//! ## Next Alarm
//!
//! ```text
//!  now = 08:00
//!  06:00  07:30  [09:15]  22:00      -> 09:15 rings next today
//!
//!  now = 23:00
//! [06:00] 07:30   09:15   22:00      -> nothing left today, wrap to 06:00
//! ```

use log::warn;

use crate::error::{ClockError, ClockResult};
use crate::ring::{CircularList, Direction, Iter};
use crate::types::{validate_days, validate_label, Alarm, AlarmDraft, AlarmPatch, TimeOfDay, Weekday};

const COLLECTION: &str = "alarms";

/// Sort key of the alarm ring
fn by_time(alarm: &Alarm) -> TimeOfDay {
    alarm.time
}

/// Alarms ordered by time of day.
///
/// ## Example
///
/// ```
/// use clock_ring::collections::AlarmBook;
/// use clock_ring::types::{AlarmDraft, TimeOfDay};
///
/// let mut book = AlarmBook::new();
/// for time in ["07:30", "06:00", "09:15"] {
///     let time: TimeOfDay = time.parse().unwrap();
///     book.create(AlarmDraft::new(time), 0).unwrap();
/// }
///
/// let times: Vec<String> = book.iter().map(|a| a.time.to_string()).collect();
/// assert_eq!(times, ["06:00", "07:30", "09:15"]);
///
/// let last = book.iter().last().unwrap().id;
/// let wrapped = book.navigate(last, "next".parse().unwrap()).unwrap();
/// assert_eq!(wrapped.time.to_string(), "06:00");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlarmBook {
    alarms: CircularList<Alarm>,
}

impl AlarmBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alarms: CircularList::with_capacity(capacity),
        }
    }

    /// Replace the contents with persisted records.
    ///
    /// Records are replayed through the same sorted insert as `create`,
    /// so the stored order does not matter.
    pub fn load(&mut self, records: impl IntoIterator<Item = Alarm>) -> usize {
        self.alarms.clear();
        for alarm in records {
            self.alarms.insert_sorted(alarm, by_time);
        }
        self.alarms.size()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create an alarm from a draft.
    ///
    /// The id is one more than the largest id present (1 when empty).
    pub fn create(&mut self, draft: AlarmDraft, created_at: u64) -> ClockResult<Alarm> {
        let label = validate_label(&draft.label)?;
        validate_days(&draft.days)?;

        let alarm = Alarm {
            id: self.next_id()?,
            time: draft.time,
            label,
            enabled: draft.enabled,
            days: draft.days,
            created_at,
        };
        self.alarms.insert_sorted(alarm.clone(), by_time);
        Ok(alarm)
    }

    /// Apply `patch` to alarm `id`, re-sorting it.
    ///
    /// The patch is validated before the alarm is touched, so a rejected
    /// patch leaves the collection unchanged.
    pub fn update(&mut self, id: u64, patch: AlarmPatch) -> ClockResult<Alarm> {
        let label = patch.label.as_deref().map(validate_label).transpose()?;
        if let Some(days) = &patch.days {
            validate_days(days)?;
        }

        let mut alarm = self.take(id)?;
        if let Some(time) = patch.time {
            alarm.time = time;
        }
        if let Some(label) = label {
            alarm.label = label;
        }
        if let Some(enabled) = patch.enabled {
            alarm.enabled = enabled;
        }
        if let Some(days) = patch.days {
            alarm.days = days;
        }

        self.alarms.insert_sorted(alarm.clone(), by_time);
        Ok(alarm)
    }

    /// Flip `enabled` on alarm `id`
    pub fn toggle(&mut self, id: u64) -> ClockResult<Alarm> {
        let mut alarm = self.take(id)?;
        alarm.enabled = !alarm.enabled;
        self.alarms.insert_sorted(alarm.clone(), by_time);
        Ok(alarm)
    }

    /// Remove alarm `id`, returning it
    pub fn delete(&mut self, id: u64) -> ClockResult<Alarm> {
        self.take(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: u64) -> Option<&Alarm> {
        self.alarms.find(|alarm| alarm.id == id)
    }

    /// Every alarm, earliest first
    pub fn all(&self) -> Vec<Alarm> {
        self.alarms.get_all()
    }

    pub fn iter(&self) -> Iter<'_, Alarm> {
        self.alarms.iter()
    }

    pub fn len(&self) -> usize {
        self.alarms.size()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Enabled alarms, earliest first
    pub fn active(&self) -> Vec<Alarm> {
        self.alarms.find_all(|alarm| alarm.enabled)
    }

    pub fn count_active(&self) -> usize {
        self.alarms.iter().filter(|alarm| alarm.enabled).count()
    }

    /// Alarms that ring on `day`; one-off alarms match every day
    pub fn for_day(&self, day: Weekday) -> Vec<Alarm> {
        self.alarms.find_all(|alarm| alarm.rings_on(day))
    }

    /// The enabled alarm that rings next after `now`.
    ///
    /// Picks the first enabled alarm at or after `now`; if none is left
    /// today, wraps to the earliest enabled alarm (tomorrow). `None` when
    /// no alarm is enabled.
    pub fn next_to_ring(&self, now: TimeOfDay) -> Option<&Alarm> {
        let mut earliest = None;
        for alarm in self.alarms.iter().filter(|alarm| alarm.enabled) {
            if alarm.time >= now {
                return Some(alarm);
            }
            earliest.get_or_insert(alarm);
        }
        earliest
    }

    /// Minutes from `now` until [`next_to_ring`](Self::next_to_ring) fires
    pub fn minutes_until_next(&self, now: TimeOfDay) -> Option<u16> {
        self.next_to_ring(now).map(|alarm| now.minutes_until(alarm.time))
    }

    /// Neighbour of alarm `id` in time order, wrapping around the day.
    pub fn navigate(&self, id: u64, direction: Direction) -> ClockResult<&Alarm> {
        self.alarms
            .navigate(|alarm| alarm.id == id, direction)
            .map_err(|err| {
                warn!("alarm navigation from {id} ({direction}) failed: {err}");
                ClockError::from_list(err, COLLECTION, format!("alarm {id}"))
            })
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn next_id(&self) -> ClockResult<u64> {
        match self.alarms.iter().map(|alarm| alarm.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(ClockError::IdExhausted("alarm ids")),
        }
    }

    fn take(&mut self, id: u64) -> ClockResult<Alarm> {
        self.alarms.delete(|alarm| alarm.id == id).ok_or_else(|| {
            warn!("alarm {id} not found");
            ClockError::NotFound(format!("alarm {id}"))
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
