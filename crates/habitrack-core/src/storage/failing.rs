//! Store wrapper whose record reads can be switched to fail.

use std::cell::Cell;

use chrono::NaiveDate;

use super::{MemoryStore, RecordStore, TrackerRepository};
use crate::error::PersistenceError;
use crate::tracker::{Tracker, TrackerCategory, TrackerId, TrackerRecord};

pub(crate) const READ_FAILURE: &str = "disk I/O error";

/// Delegates to a [`MemoryStore`]; once `fail_reads` is set, every record
/// read returns `QueryFailed(READ_FAILURE)`. Writes keep working.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    pub inner: MemoryStore,
    pub fail_reads: Cell<bool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.fail_reads.get() {
            Err(PersistenceError::QueryFailed(READ_FAILURE.to_string()))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn is_read_failure(err: &PersistenceError) -> bool {
    matches!(err, PersistenceError::QueryFailed(message) if message == READ_FAILURE)
}

impl TrackerRepository for FailingStore {
    fn add_tracker(&mut self, tracker: &Tracker) -> Result<(), PersistenceError> {
        self.inner.add_tracker(tracker)
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<(), PersistenceError> {
        self.inner.delete_tracker(id)
    }

    fn set_pinned(&mut self, id: TrackerId, pinned: bool) -> Result<(), PersistenceError> {
        self.inner.set_pinned(id, pinned)
    }

    fn set_category(&mut self, id: TrackerId, category: &str) -> Result<(), PersistenceError> {
        self.inner.set_category(id, category)
    }

    fn get_tracker(&self, id: TrackerId) -> Result<Option<Tracker>, PersistenceError> {
        self.inner.get_tracker(id)
    }

    fn fetch_all(&self) -> Result<Vec<TrackerCategory>, PersistenceError> {
        self.inner.fetch_all()
    }
}

impl RecordStore for FailingStore {
    fn add_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        self.inner.add_record(id, day)
    }

    fn remove_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        self.inner.remove_record(id, day)
    }

    fn record_exists(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        self.check()?;
        self.inner.record_exists(id, day)
    }

    fn record_count(&self, id: TrackerId) -> Result<u32, PersistenceError> {
        self.check()?;
        self.inner.record_count(id)
    }

    fn all_records(&self) -> Result<Vec<TrackerRecord>, PersistenceError> {
        self.check()?;
        self.inner.all_records()
    }
}
