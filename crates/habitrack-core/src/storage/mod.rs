//! Persistence for trackers and completion records.
//!
//! [`TrackerRepository`] and [`RecordStore`] are the contract the engine
//! needs from storage. [`MemoryStore`] keeps everything in process;
//! [`TrackerDb`] persists to SQLite.

mod config;
#[cfg(test)]
pub(crate) mod failing;
pub mod memory;
pub mod migrations;
pub mod tracker_db;

pub use config::{Config, TrackersConfig, ViewConfig};
pub use memory::MemoryStore;
pub use tracker_db::TrackerDb;

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::PersistenceError;
use crate::tracker::{Tracker, TrackerCategory, TrackerId, TrackerRecord};

/// Source of truth for trackers.
///
/// Listing goes through [`fetch_all`](TrackerRepository::fetch_all) only;
/// filtering, search and pin handling happen downstream.
pub trait TrackerRepository {
    /// Store a new tracker. Rejects an id that is already present.
    fn add_tracker(&mut self, tracker: &Tracker) -> Result<(), PersistenceError>;

    /// Delete a tracker together with all of its records.
    fn delete_tracker(&mut self, id: TrackerId) -> Result<(), PersistenceError>;

    fn set_pinned(&mut self, id: TrackerId, pinned: bool) -> Result<(), PersistenceError>;

    fn set_category(&mut self, id: TrackerId, category: &str) -> Result<(), PersistenceError>;

    fn get_tracker(&self, id: TrackerId) -> Result<Option<Tracker>, PersistenceError>;

    /// All trackers grouped by category name, categories ordered by name and
    /// trackers in creation order. Empty categories never appear.
    fn fetch_all(&self) -> Result<Vec<TrackerCategory>, PersistenceError>;
}

/// Completion marks, at most one per tracker per calendar day.
pub trait RecordStore {
    /// Insert a record. Returns `false` if it already existed.
    fn add_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError>;

    /// Remove a record. Returns `false` if there was nothing to remove.
    fn remove_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError>;

    fn record_exists(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError>;

    /// All-time number of records for a tracker.
    fn record_count(&self, id: TrackerId) -> Result<u32, PersistenceError>;

    /// Full history ordered by day, then tracker id.
    fn all_records(&self) -> Result<Vec<TrackerRecord>, PersistenceError>;
}

/// Group trackers (already in creation order) by category name.
pub(crate) fn group_by_category(trackers: impl IntoIterator<Item = Tracker>) -> Vec<TrackerCategory> {
    let mut groups: BTreeMap<String, Vec<Tracker>> = BTreeMap::new();
    for tracker in trackers {
        groups.entry(tracker.category.clone()).or_default().push(tracker);
    }
    groups
        .into_iter()
        .map(|(name, trackers)| TrackerCategory::new(name, trackers))
        .collect()
}

/// Returns the data directory.
///
/// `HABITRACK_DATA_DIR` wins when set; otherwise `~/.config/habitrack[-dev]/`
/// based on `HABITRACK_ENV` (set it to `dev` for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HABITRACK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitrack-dev")
            } else {
                base_dir.join("habitrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
