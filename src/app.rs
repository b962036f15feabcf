//! The clock application: three collections plus their stores.
//!
//! ## Persistence
//!
//! ```text
//!  open ──> load each store ──> replay into its ring
//!
//!  mutate collection ──> fingerprint(get_all()) ──changed?──> save
//!                                               └─same─────> skip
//! ```
//!
//! Each collection remembers the SHA-256 fingerprint of what its store
//! last held. A mutation that leaves the records byte-identical (for
//! example reordering a favorite onto its own slot) does not touch the
//! store. [`ClockApp::flush`] writes all three unconditionally.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::collections::{AlarmBook, FavoriteZones, LapLog};
use crate::config::ClockConfig;
use crate::error::ClockResult;
use crate::store::{fingerprint, JsonFileStore, MemoryStore, RecordStore};
use crate::types::{Alarm, AlarmDraft, AlarmPatch, FavoriteTimezone, Lap, TimeOfDay, TimezoneCatalog};

/// The three record stores backing a [`ClockApp`]
pub struct Stores {
    pub alarms: Box<dyn RecordStore<Alarm>>,
    pub laps: Box<dyn RecordStore<Lap>>,
    pub favorites: Box<dyn RecordStore<FavoriteTimezone>>,
}

impl Stores {
    /// JSON files at the paths named by `config`
    pub fn json(config: &ClockConfig) -> Self {
        Self {
            alarms: Box::new(JsonFileStore::new(config.alarms_path())),
            laps: Box::new(JsonFileStore::new(config.laps_path())),
            favorites: Box::new(JsonFileStore::new(config.favorites_path())),
        }
    }

    /// Empty in-memory stores
    pub fn memory() -> Self {
        Self {
            alarms: Box::new(MemoryStore::new()),
            laps: Box::new(MemoryStore::new()),
            favorites: Box::new(MemoryStore::new()),
        }
    }
}

/// Fingerprints of what each store last held
#[derive(Debug, Clone, Copy, Default)]
struct Saved {
    alarms: [u8; 32],
    laps: [u8; 32],
    favorites: [u8; 32],
}

pub struct ClockApp {
    alarms: AlarmBook,
    laps: LapLog,
    favorites: FavoriteZones,
    catalog: TimezoneCatalog,
    stores: Stores,
    saved: Saved,
    writes: usize,
}

impl ClockApp {
    /// Open the JSON stores under `config.data_dir` with the built-in
    /// time zone catalog.
    pub fn open(config: &ClockConfig) -> ClockResult<Self> {
        info!("opening clock data in {}", config.data_dir().display());
        Self::with_stores(Stores::json(config), TimezoneCatalog::fallback(), config.initial_capacity)
    }

    /// Load every collection from `stores`.
    ///
    /// # Arguments
    ///
    /// * `stores` - persistence for the three collections
    /// * `catalog` - zones a favorite may be chosen from
    /// * `capacity` - arena slots preallocated per collection
    pub fn with_stores(stores: Stores, catalog: TimezoneCatalog, capacity: usize) -> ClockResult<Self> {
        let mut alarms = AlarmBook::with_capacity(capacity);
        let mut laps = LapLog::with_capacity(capacity);
        let mut favorites = FavoriteZones::with_capacity(capacity);

        let alarm_records = stores.alarms.load()?;
        let lap_records = stores.laps.load()?;
        let favorite_records = stores.favorites.load()?;

        let saved = Saved {
            alarms: fingerprint(&alarm_records)?,
            laps: fingerprint(&lap_records)?,
            favorites: fingerprint(&favorite_records)?,
        };

        info!("loaded {} alarms from {}", alarms.load(alarm_records), stores.alarms.describe());
        info!("loaded {} laps from {}", laps.load(lap_records), stores.laps.describe());
        info!(
            "loaded {} favorites from {}",
            favorites.load(favorite_records),
            stores.favorites.describe()
        );

        Ok(Self {
            alarms,
            laps,
            favorites,
            catalog,
            stores,
            saved,
            writes: 0,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn alarms(&self) -> &AlarmBook {
        &self.alarms
    }

    pub fn laps(&self) -> &LapLog {
        &self.laps
    }

    pub fn favorites(&self) -> &FavoriteZones {
        &self.favorites
    }

    pub fn catalog(&self) -> &TimezoneCatalog {
        &self.catalog
    }

    /// Store writes performed since open
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn next_alarm(&self, now: TimeOfDay) -> Option<&Alarm> {
        self.alarms.next_to_ring(now)
    }

    // ========================================================================
    // Alarms
    // ========================================================================

    pub fn create_alarm(&mut self, draft: AlarmDraft) -> ClockResult<Alarm> {
        let alarm = self.change_alarms(|alarms| alarms.create(draft, now_millis()))?;
        info!("created alarm {} at {} ({})", alarm.id, alarm.time, alarm.label);
        Ok(alarm)
    }

    pub fn update_alarm(&mut self, id: u64, patch: AlarmPatch) -> ClockResult<Alarm> {
        let alarm = self.change_alarms(|alarms| alarms.update(id, patch))?;
        info!("updated alarm {id}, now at {}", alarm.time);
        Ok(alarm)
    }

    pub fn toggle_alarm(&mut self, id: u64) -> ClockResult<Alarm> {
        let alarm = self.change_alarms(|alarms| alarms.toggle(id))?;
        info!("alarm {id} {}", if alarm.enabled { "enabled" } else { "disabled" });
        Ok(alarm)
    }

    pub fn delete_alarm(&mut self, id: u64) -> ClockResult<Alarm> {
        let alarm = self.change_alarms(|alarms| alarms.delete(id))?;
        info!("deleted alarm {id}");
        Ok(alarm)
    }

    // ========================================================================
    // Laps
    // ========================================================================

    pub fn add_lap(&mut self, lap_time: Decimal, total_time: Decimal) -> ClockResult<Lap> {
        let lap = self.change_laps(|laps| laps.add(lap_time, total_time, now_millis()))?;
        info!("lap #{} recorded: {} ({} total)", lap.lap_number, lap.lap_time, lap.total_time);
        Ok(lap)
    }

    pub fn delete_lap(&mut self, id: u64) -> ClockResult<Lap> {
        let lap = self.change_laps(|laps| laps.delete(id))?;
        info!("deleted lap {id}");
        Ok(lap)
    }

    pub fn clear_laps(&mut self) -> ClockResult<usize> {
        let removed = self.change_laps(|laps| Ok(laps.clear()))?;
        info!("cleared {removed} laps");
        Ok(removed)
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub fn add_favorite(&mut self, id: &str) -> ClockResult<FavoriteTimezone> {
        let favorite = self.change_favorites(|favorites, catalog| favorites.add(catalog, id))?;
        info!("added favorite {} at position {}", favorite.id, favorite.order);
        Ok(favorite)
    }

    pub fn remove_favorite(&mut self, id: &str) -> ClockResult<FavoriteTimezone> {
        let favorite = self.change_favorites(|favorites, _| favorites.remove(id))?;
        info!("removed favorite {id}");
        Ok(favorite)
    }

    pub fn reorder_favorite(&mut self, id: &str, position: usize) -> ClockResult<FavoriteTimezone> {
        let favorite = self.change_favorites(|favorites, _| favorites.reorder(id, position))?;
        info!("moved favorite {id} to position {}", favorite.order);
        Ok(favorite)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write every collection, changed or not
    pub fn flush(&mut self) -> ClockResult<()> {
        self.saved = Saved::default();
        self.persist_alarms()?;
        self.persist_laps()?;
        self.persist_favorites()?;
        Ok(())
    }

    /// Flush and drop the app
    pub fn close(mut self) -> ClockResult<()> {
        self.flush()?;
        info!("clock data closed after {} writes", self.writes);
        Ok(())
    }

    // Each change runs against the live collection and is undone from a
    // snapshot if the store rejects the result.

    fn change_alarms<T>(&mut self, change: impl FnOnce(&mut AlarmBook) -> ClockResult<T>) -> ClockResult<T> {
        let snapshot = self.alarms.clone();
        let out = change(&mut self.alarms)?;
        if let Err(err) = self.persist_alarms() {
            warn!("alarm change rolled back: {err}");
            self.alarms = snapshot;
            return Err(err);
        }
        Ok(out)
    }

    fn change_laps<T>(&mut self, change: impl FnOnce(&mut LapLog) -> ClockResult<T>) -> ClockResult<T> {
        let snapshot = self.laps.clone();
        let out = change(&mut self.laps)?;
        if let Err(err) = self.persist_laps() {
            warn!("lap change rolled back: {err}");
            self.laps = snapshot;
            return Err(err);
        }
        Ok(out)
    }

    fn change_favorites<T>(
        &mut self,
        change: impl FnOnce(&mut FavoriteZones, &TimezoneCatalog) -> ClockResult<T>,
    ) -> ClockResult<T> {
        let snapshot = self.favorites.clone();
        let out = change(&mut self.favorites, &self.catalog)?;
        if let Err(err) = self.persist_favorites() {
            warn!("favorite change rolled back: {err}");
            self.favorites = snapshot;
            return Err(err);
        }
        Ok(out)
    }

    fn persist_alarms(&mut self) -> ClockResult<()> {
        let records = self.alarms.all();
        if persist(self.stores.alarms.as_mut(), &mut self.saved.alarms, &records)? {
            self.writes += 1;
        }
        Ok(())
    }

    fn persist_laps(&mut self) -> ClockResult<()> {
        let records = self.laps.all();
        if persist(self.stores.laps.as_mut(), &mut self.saved.laps, &records)? {
            self.writes += 1;
        }
        Ok(())
    }

    fn persist_favorites(&mut self) -> ClockResult<()> {
        let records = self.favorites.all();
        if persist(self.stores.favorites.as_mut(), &mut self.saved.favorites, &records)? {
            self.writes += 1;
        }
        Ok(())
    }
}

/// Save `records` unless their fingerprint equals `saved`.
///
/// Returns whether the store was written. `saved` is only updated after
/// a successful save.
fn persist<R: Serialize>(
    store: &mut dyn RecordStore<R>,
    saved: &mut [u8; 32],
    records: &[R],
) -> ClockResult<bool> {
    let current = fingerprint(records)?;
    if current == *saved {
        debug!("{} unchanged, skipping write", store.describe());
        return Ok(false);
    }

    store.save(records)?;
    *saved = current;
    Ok(true)
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

// ============================================================================
// Unit Tests
// ============================================================================
