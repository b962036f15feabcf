//! Record stores for the clock collections.
//!
//! ## Overview
//!
//! A [`RecordStore`] persists one collection as a flat list of records in
//! ring order. The collections never talk to a store directly;
//! [`ClockApp`](crate::app::ClockApp) loads them on open and saves the
//! affected collection after each mutation.
//!
//! ## Stores
//!
//! - [`MemoryStore`]: keeps the last saved records in memory
//! - [`JsonFileStore`]: one pretty-printed JSON array per file, written
//!   through a temp file and renamed into place
//!
//! ## Fingerprints
//!
//! [`fingerprint`] hashes the canonical `serde_json` encoding of a record
//! list with SHA-256. Equal record lists give equal fingerprints, which
//! is how the app skips writes that would not change anything.
//!
//! ```
//! use clock_ring::store::fingerprint_hex;
//!
//! let a = fingerprint_hex(&["06:00", "07:30"]).unwrap();
//! let b = fingerprint_hex(&["06:00", "07:30"]).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 64);
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::StoreError;

/// Persistence for one collection's records, in ring order.
pub trait RecordStore<R> {
    /// Load every stored record.
    ///
    /// A store that holds nothing yet yields an empty list.
    fn load(&self) -> Result<Vec<R>, StoreError>;

    /// Replace the stored records with `records`
    fn save(&mut self, records: &[R]) -> Result<(), StoreError>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store, used by tests and the demo.
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    records: Vec<R>,
    saves: usize,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            saves: 0,
        }
    }

    /// Store pre-seeded with `records`
    pub fn with_records(records: Vec<R>) -> Self {
        Self { records, saves: 0 }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// How many times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> RecordStore<R> for MemoryStore<R> {
    fn load(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[R]) -> Result<(), StoreError> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// Store backed by a JSON array file.
///
/// Loading is lenient: a missing file is an empty collection, a file that
/// is not a JSON array is logged and treated as empty, and array items
/// that do not decode as `R` are logged and skipped.
#[derive(Debug, Clone)]
pub struct JsonFileStore<R> {
    path: PathBuf,
    _records: PhantomData<fn() -> R>,
}

impl<R> JsonFileStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<R> RecordStore<R> for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<R>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let items = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                warn!(
                    "{} holds a JSON {} instead of an array, starting empty",
                    self.path.display(),
                    json_kind(&other)
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!("{} is corrupt ({err}), starting empty", self.path.display());
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(record) => records.push(record),
                Err(err) => warn!("{}: skipping record {index}: {err}", self.path.display()),
            }
        }
        Ok(records)
    }

    fn save(&mut self, records: &[R]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!("wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Fingerprints
// ============================================================================

/// SHA-256 of the canonical JSON encoding of `records`
pub fn fingerprint<R: Serialize>(records: &[R]) -> Result<[u8; 32], StoreError> {
    let bytes = serde_json::to_vec(records)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    Ok(hash)
}

/// [`fingerprint`] as lowercase hex
pub fn fingerprint_hex<R: Serialize>(records: &[R]) -> Result<String, StoreError> {
    fingerprint(records).map(hex::encode)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimezoneCatalog, FavoriteTimezone};

    fn zones() -> Vec<FavoriteTimezone> {
        let catalog = TimezoneCatalog::fallback();
        ["japan-tokyo", "peru-lima"]
            .iter()
            .enumerate()
            .map(|(order, id)| FavoriteTimezone::from_zone(catalog.get(id).unwrap(), order))
            .collect()
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        store.save(&zones()).unwrap();
        assert_eq!(store.load().unwrap(), zones());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("timezones.json"));

        assert!(store.load().unwrap().is_empty());
        store.save(&zones()).unwrap();

        assert_eq!(store.load().unwrap(), zones());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_json_store_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarms.json");
        fs::write(&path, "{ not json").unwrap();

        let store: JsonFileStore<FavoriteTimezone> = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        fs::write(&path, r#"{"id": 1}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_skips_invalid_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timezones.json");
        let mut items = serde_json::to_value(zones()).unwrap();
        items.as_array_mut().unwrap().insert(1, serde_json::json!({ "id": "broken" }));
        fs::write(&path, items.to_string()).unwrap();

        let store: JsonFileStore<FavoriteTimezone> = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), zones());
    }

    #[test]
    fn test_fingerprint_determinism() {
        let a = fingerprint(&zones()).unwrap();
        let b = fingerprint(&zones()).unwrap();
        assert_eq!(a, b);

        let mut changed = zones();
        changed.swap(0, 1);
        assert_ne!(fingerprint(&changed).unwrap(), a);
        assert_eq!(fingerprint_hex(&zones()).unwrap(), hex::encode(a));
    }
}
