//! Where the clock collections live on disk.
//!
//! Defaults match the layout the clock has always used: three JSON files
//! under `data/`. `from_file` reads a JSON config in which every field
//! is optional; `from_env` and `from_file` both apply the environment
//! overrides, so a deployment can move the directory or tune the arena
//! preallocation without code changes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::error::StoreError;

/// Overrides `data_dir`
pub const DATA_DIR_VAR: &str = "CLOCK_DATA_DIR";

/// Overrides `initial_capacity`
pub const CAPACITY_VAR: &str = "CLOCK_INITIAL_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub data_dir: PathBuf,
    pub alarms_file: String,
    pub laps_file: String,
    pub favorites_file: String,

    /// Arena slots preallocated per collection
    pub initial_capacity: usize,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            alarms_file: "alarms.json".to_string(),
            laps_file: "laps.json".to_string(),
            favorites_file: "timezones.json".to_string(),
            initial_capacity: 64,
        }
    }
}

impl ClockConfig {
    /// Defaults with `CLOCK_DATA_DIR` and `CLOCK_INITIAL_CAPACITY` applied.
    ///
    /// An unparsable capacity is logged and ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    /// Read a JSON config file, then apply the environment overrides.
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config.with_overrides(|name| env::var(name).ok()))
    }

    /// Same config rooted at `data_dir`
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(CAPACITY_VAR) {
            match raw.trim().parse() {
                Ok(capacity) => self.initial_capacity = capacity,
                Err(err) => warn!("ignoring {CAPACITY_VAR}={raw:?}: {err}"),
            }
        }
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn alarms_path(&self) -> PathBuf {
        self.data_dir.join(&self.alarms_file)
    }

    pub fn laps_path(&self) -> PathBuf {
        self.data_dir.join(&self.laps_file)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join(&self.favorites_file)
    }
}
