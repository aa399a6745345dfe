//! In-process store.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use super::{group_by_category, RecordStore, TrackerRepository};
use crate::error::PersistenceError;
use crate::tracker::{Tracker, TrackerCategory, TrackerId, TrackerRecord};

/// Trackers and records held in memory.
///
/// Trackers keep insertion order; records are keyed `(day, tracker)` so the
/// history comes out ordered by day.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    trackers: Vec<Tracker>,
    records: BTreeSet<(NaiveDate, TrackerId)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tracker_mut(&mut self, id: TrackerId) -> Result<&mut Tracker, PersistenceError> {
        self.trackers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PersistenceError::TrackerNotFound(id))
    }

    fn ensure_tracker(&self, id: TrackerId) -> Result<(), PersistenceError> {
        if self.trackers.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(PersistenceError::TrackerNotFound(id))
        }
    }
}

impl TrackerRepository for MemoryStore {
    fn add_tracker(&mut self, tracker: &Tracker) -> Result<(), PersistenceError> {
        if self.trackers.iter().any(|t| t.id == tracker.id) {
            return Err(PersistenceError::DuplicateTracker(tracker.id));
        }
        self.trackers.push(tracker.clone());
        debug!(id = %tracker.id, category = %tracker.category, "tracker added");
        Ok(())
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<(), PersistenceError> {
        let position = self
            .trackers
            .iter()
            .position(|t| t.id == id)
            .ok_or(PersistenceError::TrackerNotFound(id))?;
        self.trackers.remove(position);
        self.records.retain(|(_, tracker_id)| *tracker_id != id);
        debug!(%id, "tracker deleted with its records");
        Ok(())
    }

    fn set_pinned(&mut self, id: TrackerId, pinned: bool) -> Result<(), PersistenceError> {
        self.tracker_mut(id)?.pinned = pinned;
        Ok(())
    }

    fn set_category(&mut self, id: TrackerId, category: &str) -> Result<(), PersistenceError> {
        self.tracker_mut(id)?.category = category.to_string();
        Ok(())
    }

    fn get_tracker(&self, id: TrackerId) -> Result<Option<Tracker>, PersistenceError> {
        Ok(self.trackers.iter().find(|t| t.id == id).cloned())
    }

    fn fetch_all(&self) -> Result<Vec<TrackerCategory>, PersistenceError> {
        Ok(group_by_category(self.trackers.iter().cloned()))
    }
}

impl RecordStore for MemoryStore {
    fn add_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        self.ensure_tracker(id)?;
        Ok(self.records.insert((day, id)))
    }

    fn remove_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        Ok(self.records.remove(&(day, id)))
    }

    fn record_exists(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        Ok(self.records.contains(&(day, id)))
    }

    fn record_count(&self, id: TrackerId) -> Result<u32, PersistenceError> {
        Ok(self.records.iter().filter(|(_, t)| *t == id).count() as u32)
    }

    fn all_records(&self) -> Result<Vec<TrackerRecord>, PersistenceError> {
        Ok(self
            .records
            .iter()
            .map(|&(day, tracker_id)| TrackerRecord { tracker_id, day })
            .collect())
    }
}
