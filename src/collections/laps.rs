//! Stopwatch lap log: newest lap at the head of the ring.
//!
//! Laps enter through `insert_at_beginning`, so enumeration runs newest
//! first and the head always carries the latest stopwatch reading.
//!
//! ```text
//!  head
//!   v
//! [#3 15.23s] <-> [#2 12.45s] <-> [#1 18.67s] <-> (back to #3)
//! ```

use log::warn;
use rust_decimal::Decimal;

use crate::error::{ClockError, ClockResult};
use crate::ring::{CircularList, Direction, Iter};
use crate::types::seconds::{checked_average, round_seconds};
use crate::types::{Lap, LapStatistics};

const COLLECTION: &str = "laps";

/// Laps ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct LapLog {
    laps: CircularList<Lap>,
}

impl LapLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            laps: CircularList::with_capacity(capacity),
        }
    }

    /// Replace the contents with persisted records.
    ///
    /// `records` must be in stored order (newest first); they are appended
    /// so that order is kept as is.
    pub fn load(&mut self, records: impl IntoIterator<Item = Lap>) -> usize {
        self.laps.clear();
        for lap in records {
            self.laps.insert_at_end(lap);
        }
        self.laps.size()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Record a lap.
    ///
    /// # Arguments
    ///
    /// * `lap_time` - duration of this lap in seconds
    /// * `total_time` - stopwatch reading when the lap was taken
    /// * `timestamp` - capture time in milliseconds since the epoch
    ///
    /// # Returns
    ///
    /// The stored lap, or `InvalidDuration` unless both durations are
    /// positive after rounding to hundredths.
    ///
    /// # Example
    ///
    /// ```
    /// use clock_ring::collections::LapLog;
    /// use rust_decimal::Decimal;
    ///
    /// let mut log = LapLog::new();
    /// let lap = log.add(Decimal::new(12_456, 3), Decimal::new(12_456, 3), 0).unwrap();
    /// assert_eq!(lap.lap_number, 1);
    /// assert_eq!(lap.lap_time.to_string(), "12.46");
    /// assert!(log.add(Decimal::ZERO, Decimal::ONE, 0).is_err());
    /// ```
    pub fn add(&mut self, lap_time: Decimal, total_time: Decimal, timestamp: u64) -> ClockResult<Lap> {
        let lap_time = positive(lap_time, "lap time")?;
        let total_time = positive(total_time, "total time")?;

        let id = match self.laps.iter().map(|lap| lap.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or(ClockError::IdExhausted("lap ids"))?,
        };
        let lap_number = match self.laps.iter().map(|lap| lap.lap_number).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or(ClockError::IdExhausted("lap numbers"))?,
        };

        let lap = Lap {
            id,
            lap_number,
            lap_time,
            total_time,
            timestamp,
        };
        self.laps.insert_at_beginning(lap.clone());
        Ok(lap)
    }

    /// Remove lap `id`, returning it
    pub fn delete(&mut self, id: u64) -> ClockResult<Lap> {
        self.laps.delete(|lap| lap.id == id).ok_or_else(|| {
            warn!("lap {id} not found");
            ClockError::NotFound(format!("lap {id}"))
        })
    }

    /// Drop every lap, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.laps.size();
        self.laps.clear();
        removed
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: u64) -> Option<&Lap> {
        self.laps.find(|lap| lap.id == id)
    }

    pub fn get_by_number(&self, lap_number: u32) -> Option<&Lap> {
        self.laps.find(|lap| lap.lap_number == lap_number)
    }

    /// Every lap, newest first
    pub fn all(&self) -> Vec<Lap> {
        self.laps.get_all()
    }

    pub fn iter(&self) -> Iter<'_, Lap> {
        self.laps.iter()
    }

    /// Most recent lap
    pub fn first(&self) -> Option<&Lap> {
        self.laps.first()
    }

    /// Oldest lap
    pub fn last(&self) -> Option<&Lap> {
        self.laps.last()
    }

    pub fn len(&self) -> usize {
        self.laps.size()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    /// Shortest lap; the newest one wins a tie
    pub fn fastest(&self) -> Option<&Lap> {
        self.laps
            .iter()
            .reduce(|best, lap| if lap.lap_time < best.lap_time { lap } else { best })
    }

    /// Longest lap; the newest one wins a tie
    pub fn slowest(&self) -> Option<&Lap> {
        self.laps
            .iter()
            .reduce(|worst, lap| if lap.lap_time > worst.lap_time { lap } else { worst })
    }

    /// Laps strictly shorter than `threshold` seconds, newest first
    pub fn faster_than(&self, threshold: Decimal) -> Vec<Lap> {
        self.laps.find_all(|lap| lap.lap_time < threshold)
    }

    /// Laps strictly longer than `threshold` seconds, newest first
    pub fn slower_than(&self, threshold: Decimal) -> Vec<Lap> {
        self.laps.find_all(|lap| lap.lap_time > threshold)
    }

    /// Single pass over the ring.
    ///
    /// `total_elapsed_time` is the head's stopwatch reading, not a sum of
    /// lap durations.
    pub fn statistics(&self) -> LapStatistics {
        let Some(latest) = self.laps.first() else {
            return LapStatistics::default();
        };

        let mut fastest = latest;
        let mut slowest = latest;
        // None once the running total overflows; the average then reads 0
        let mut sum = Some(Decimal::ZERO);
        for lap in self.laps.iter() {
            if lap.lap_time < fastest.lap_time {
                fastest = lap;
            }
            if lap.lap_time > slowest.lap_time {
                slowest = lap;
            }
            sum = sum.and_then(|total| total.checked_add(lap.lap_time));
        }

        let total_laps = self.laps.size();
        LapStatistics {
            total_laps,
            fastest_lap: Some(fastest.clone()),
            slowest_lap: Some(slowest.clone()),
            average_lap_time: sum
                .and_then(|total| checked_average(total, total_laps))
                .unwrap_or_default(),
            total_elapsed_time: latest.total_time,
        }
    }

    /// Neighbour of lap `lap_number` in ring order.
    ///
    /// `Next` moves toward older laps; past the oldest it wraps to the
    /// newest.
    pub fn navigate(&self, lap_number: u32, direction: Direction) -> ClockResult<&Lap> {
        self.laps
            .navigate(|lap| lap.lap_number == lap_number, direction)
            .map_err(|err| {
                warn!("lap navigation from #{lap_number} ({direction}) failed: {err}");
                ClockError::from_list(err, COLLECTION, format!("lap #{lap_number}"))
            })
    }
}

fn positive(value: Decimal, what: &str) -> ClockResult<Decimal> {
    let rounded = round_seconds(value);
    if rounded <= Decimal::ZERO {
        return Err(ClockError::InvalidDuration(format!("{what} must be positive, got {value}")));
    }
    Ok(rounded)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(hundredths: i64) -> Decimal {
        Decimal::new(hundredths, 2)
    }

    /// Laps of 12.45, 15.23, 18.67 and 14.79 seconds
    fn sample_log() -> LapLog {
        let mut log = LapLog::new();
        let mut total = 0;
        for lap in [1245, 1523, 1867, 1479] {
            total += lap;
            log.add(secs(lap), secs(total), 0).unwrap();
        }
        log
    }

    fn numbers(log: &LapLog) -> Vec<u32> {
        log.iter().map(|lap| lap.lap_number).collect()
    }

    #[test]
    fn test_newest_first() {
        let log = sample_log();

        assert_eq!(numbers(&log), vec![4, 3, 2, 1]);
        assert_eq!(log.first().unwrap().lap_number, 4);
        assert_eq!(log.last().unwrap().lap_number, 1);
    }

    #[test]
    fn test_add_rejects_non_positive() {
        let mut log = LapLog::new();

        assert!(matches!(log.add(secs(-100), secs(100), 0), Err(ClockError::InvalidDuration(_))));
        assert!(matches!(log.add(secs(100), Decimal::ZERO, 0), Err(ClockError::InvalidDuration(_))));
        assert!(matches!(
            log.add(Decimal::new(1, 3), secs(100), 0),
            Err(ClockError::InvalidDuration(_))
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn test_statistics() {
        let stats = sample_log().statistics();

        assert_eq!(stats.total_laps, 4);
        assert_eq!(stats.fastest_lap.as_ref().unwrap().lap_time, secs(1245));
        assert_eq!(stats.slowest_lap.as_ref().unwrap().lap_time, secs(1867));
        assert_eq!(stats.average_lap_time, secs(1528));
        assert_eq!(stats.total_elapsed_time, secs(6114));
        assert_eq!(stats.format_total_time(), "01:01.14");
    }

    #[test]
    fn test_statistics_empty() {
        let stats = LapLog::new().statistics();

        assert_eq!(stats, LapStatistics::default());
        assert!(stats.fastest_lap.is_none());
    }

    #[test]
    fn test_statistics_survive_overflowing_total() {
        let mut stored = sample_log().all();
        for lap in &mut stored {
            lap.lap_time = Decimal::MAX;
        }
        let mut log = LapLog::new();
        log.load(stored);

        let stats = log.statistics();
        assert_eq!(stats.total_laps, 4);
        assert_eq!(stats.average_lap_time, Decimal::ZERO);
        assert_eq!(stats.fastest_lap.unwrap().lap_number, 4);
    }

    #[test]
    fn test_add_fails_when_numbers_exhausted() {
        let mut stored = sample_log().all();
        stored[0].lap_number = u32::MAX;
        let mut log = LapLog::new();
        log.load(stored.clone());

        assert!(matches!(log.add(secs(100), secs(7000), 0), Err(ClockError::IdExhausted("lap numbers"))));

        stored[0].lap_number = 5;
        stored[0].id = u64::MAX;
        log.load(stored);
        assert!(matches!(log.add(secs(100), secs(7000), 0), Err(ClockError::IdExhausted("lap ids"))));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_fastest_tie_goes_to_first_encountered() {
        let mut log = LapLog::new();
        log.add(secs(1000), secs(1000), 0).unwrap();
        log.add(secs(1000), secs(2000), 0).unwrap();

        assert_eq!(log.fastest().unwrap().lap_number, 2);
        assert_eq!(log.slowest().unwrap().lap_number, 2);
        assert_eq!(log.statistics().fastest_lap.unwrap().lap_number, 2);
    }

    #[test]
    fn test_navigate_wraps() {
        let log = sample_log();

        assert_eq!(log.navigate(1, Direction::Next).unwrap().lap_number, 4);
        assert_eq!(log.navigate(4, Direction::Previous).unwrap().lap_number, 1);
        assert_eq!(log.navigate(3, Direction::Next).unwrap().lap_number, 2);
        assert!(matches!(log.navigate(9, Direction::Next), Err(ClockError::NotFound(_))));
        assert!(matches!(
            LapLog::new().navigate(1, Direction::Next),
            Err(ClockError::EmptyCollection("laps"))
        ));
    }

    #[test]
    fn test_thresholds() {
        let log = sample_log();

        let fast: Vec<u32> = log.faster_than(secs(1500)).iter().map(|l| l.lap_number).collect();
        let slow: Vec<u32> = log.slower_than(secs(1500)).iter().map(|l| l.lap_number).collect();
        assert_eq!(fast, vec![4, 1]);
        assert_eq!(slow, vec![3, 2]);
    }

    #[test]
    fn test_delete_and_numbering() {
        let mut log = sample_log();

        assert_eq!(log.delete(4).unwrap().lap_number, 4);
        assert!(log.delete(4).is_err());
        assert_eq!(log.add(secs(1000), secs(7114), 0).unwrap().lap_number, 4);
        assert_eq!(log.get_by_number(4).unwrap().lap_time, secs(1000));
    }

    #[test]
    fn test_clear() {
        let mut log = sample_log();

        assert_eq!(log.clear(), 4);
        assert!(log.is_empty());
        assert_eq!(log.add(secs(100), secs(100), 0).unwrap().id, 1);
    }

    #[test]
    fn test_load_keeps_stored_order() {
        let stored = sample_log().all();

        let mut log = LapLog::new();
        log.load(stored.clone());
        assert_eq!(log.all(), stored);
        assert_eq!(log.statistics().total_elapsed_time, secs(6114));
    }
}
