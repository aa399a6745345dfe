//! SQLite-based storage for trackers and completion records.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::{data_dir, group_by_category, migrations, RecordStore, TrackerRepository};
use crate::error::PersistenceError;
use crate::schedule::{code_to_days, days_to_code};
use crate::tracker::{Tracker, TrackerCategory, TrackerId, TrackerRecord};

const DAY_FORMAT: &str = "%Y-%m-%d";

const TRACKER_COLUMNS: &str = "id, name, color, emoji, schedule, kind, pinned, category";

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

fn parse_day(day: &str) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map_err(|e| PersistenceError::CorruptRow(format!("day {day:?}: {e}")))
}

/// Raw column values of a `trackers` row, decoded after the query finishes so
/// that decode failures surface as `CorruptRow` rather than SQLite errors.
struct TrackerRow {
    id: String,
    name: String,
    color: u8,
    emoji: u8,
    schedule: String,
    kind: String,
    pinned: bool,
    category: String,
}

impl TrackerRow {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            color: row.get(2)?,
            emoji: row.get(3)?,
            schedule: row.get(4)?,
            kind: row.get(5)?,
            pinned: row.get(6)?,
            category: row.get(7)?,
        })
    }

    fn into_tracker(self) -> Result<Tracker, PersistenceError> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            PersistenceError::CorruptRow(format!("tracker {}: {what}: {e}", self.id))
        };
        let id = self.id.parse().map_err(|e| corrupt("id", &e))?;
        let schedule = code_to_days(&self.schedule).map_err(|e| corrupt("schedule", &e))?;
        let kind = self.kind.parse().map_err(|e| corrupt("kind", &e))?;
        Ok(Tracker {
            id,
            name: self.name,
            color: self.color,
            emoji: self.emoji,
            schedule,
            kind,
            pinned: self.pinned,
            category: self.category,
        })
    }
}

/// SQLite database for trackers and their completion records.
pub struct TrackerDb {
    conn: Connection,
}

impl TrackerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/habitrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("habitrack.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|source| PersistenceError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "database opened");
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, PersistenceError> {
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS trackers (
                seq      INTEGER PRIMARY KEY AUTOINCREMENT,
                id       TEXT NOT NULL UNIQUE,
                name     TEXT NOT NULL,
                color    INTEGER NOT NULL,
                emoji    INTEGER NOT NULL,
                schedule TEXT NOT NULL,
                pinned   INTEGER NOT NULL DEFAULT 0,
                category TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS records (
                tracker_id TEXT NOT NULL REFERENCES trackers(id) ON DELETE CASCADE,
                day        TEXT NOT NULL,
                UNIQUE(tracker_id, day)
            );",
        )?;
        migrations::migrate(&self.conn)
            .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn tracker_exists(&self, id: TrackerId) -> Result<bool, PersistenceError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM trackers WHERE id = ?1",
                params![id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn update_tracker_column(
        &self,
        id: TrackerId,
        sql: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<(), PersistenceError> {
        let changed = self.conn.execute(sql, params![value, id.to_string()])?;
        if changed == 0 {
            return Err(PersistenceError::TrackerNotFound(id));
        }
        Ok(())
    }
}

impl TrackerRepository for TrackerDb {
    fn add_tracker(&mut self, tracker: &Tracker) -> Result<(), PersistenceError> {
        if self.tracker_exists(tracker.id)? {
            return Err(PersistenceError::DuplicateTracker(tracker.id));
        }
        self.conn.execute(
            "INSERT INTO trackers (id, name, color, emoji, schedule, kind, pinned, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                tracker.id.to_string(),
                tracker.name,
                tracker.color,
                tracker.emoji,
                days_to_code(&tracker.schedule),
                tracker.kind.as_str(),
                tracker.pinned,
                tracker.category,
            ],
        )?;
        debug!(id = %tracker.id, category = %tracker.category, "tracker stored");
        Ok(())
    }

    fn delete_tracker(&mut self, id: TrackerId) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;
        let removed_records =
            tx.execute("DELETE FROM records WHERE tracker_id = ?1", params![id.to_string()])?;
        let removed = tx.execute("DELETE FROM trackers WHERE id = ?1", params![id.to_string()])?;
        if removed == 0 {
            // dropping the transaction rolls it back
            return Err(PersistenceError::TrackerNotFound(id));
        }
        tx.commit()?;
        debug!(%id, removed_records, "tracker deleted");
        Ok(())
    }

    fn set_pinned(&mut self, id: TrackerId, pinned: bool) -> Result<(), PersistenceError> {
        self.update_tracker_column(id, "UPDATE trackers SET pinned = ?1 WHERE id = ?2", &pinned)
    }

    fn set_category(&mut self, id: TrackerId, category: &str) -> Result<(), PersistenceError> {
        self.update_tracker_column(
            id,
            "UPDATE trackers SET category = ?1 WHERE id = ?2",
            &category,
        )
    }

    fn get_tracker(&self, id: TrackerId) -> Result<Option<Tracker>, PersistenceError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {TRACKER_COLUMNS} FROM trackers WHERE id = ?1"),
                params![id.to_string()],
                TrackerRow::from_row,
            )
            .optional()?;
        row.map(TrackerRow::into_tracker).transpose()
    }

    fn fetch_all(&self) -> Result<Vec<TrackerCategory>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TRACKER_COLUMNS} FROM trackers ORDER BY seq"))?;
        let rows = stmt.query_map([], TrackerRow::from_row)?;

        let mut trackers = Vec::new();
        for row in rows {
            trackers.push(row?.into_tracker()?);
        }
        Ok(group_by_category(trackers))
    }
}

impl RecordStore for TrackerDb {
    fn add_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        if !self.tracker_exists(id)? {
            return Err(PersistenceError::TrackerNotFound(id));
        }
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO records (tracker_id, day) VALUES (?1, ?2)",
            params![id.to_string(), format_day(day)],
        )?;
        if inserted == 0 {
            warn!(%id, %day, "duplicate record ignored");
        }
        Ok(inserted > 0)
    }

    fn remove_record(&mut self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        let removed = self.conn.execute(
            "DELETE FROM records WHERE tracker_id = ?1 AND day = ?2",
            params![id.to_string(), format_day(day)],
        )?;
        Ok(removed > 0)
    }

    fn record_exists(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM records WHERE tracker_id = ?1 AND day = ?2",
                params![id.to_string(), format_day(day)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn record_count(&self, id: TrackerId) -> Result<u32, PersistenceError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE tracker_id = ?1",
            params![id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn all_records(&self) -> Result<Vec<TrackerRecord>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT tracker_id, day FROM records ORDER BY day, tracker_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (tracker_id, day) = row?;
            let tracker_id = tracker_id.parse().map_err(|e| {
                PersistenceError::CorruptRow(format!("record tracker id {tracker_id:?}: {e}"))
            })?;
            records.push(TrackerRecord {
                tracker_id,
                day: parse_day(&day)?,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Schedule, WeekDay};
    use crate::tracker::{NewTracker, TrackerKind};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn habit(name: &str, category: &str) -> Tracker {
        let days: Schedule = [WeekDay::Monday, WeekDay::Wednesday].into_iter().collect();
        NewTracker::habit(name, category, days).build().unwrap()
    }

    #[test]
    fn create_and_get_tracker() {
        let mut db = TrackerDb::open_memory().unwrap();
        let tracker = habit("Read", "Study");
        db.add_tracker(&tracker).unwrap();

        let loaded = db.get_tracker(tracker.id).unwrap().unwrap();
        assert_eq!(loaded, tracker);
        assert!(db.get_tracker(TrackerId::new()).unwrap().is_none());
    }

    #[test]
    fn event_kind_round_trips() {
        let mut db = TrackerDb::open_memory().unwrap();
        let tracker = NewTracker::event("Dentist", "Health").build().unwrap();
        db.add_tracker(&tracker).unwrap();
        let loaded = db.get_tracker(tracker.id).unwrap().unwrap();
        assert_eq!(loaded.kind, TrackerKind::Event);
        assert_eq!(loaded.schedule, Schedule::every_day());
    }

    #[test]
    fn duplicate_tracker_rejected() {
        let mut db = TrackerDb::open_memory().unwrap();
        let tracker = habit("Read", "Study");
        db.add_tracker(&tracker).unwrap();
        assert!(matches!(
            db.add_tracker(&tracker),
            Err(PersistenceError::DuplicateTracker(_))
        ));
    }

    #[test]
    fn pin_and_move_tracker() {
        let mut db = TrackerDb::open_memory().unwrap();
        let tracker = habit("Read", "Study");
        db.add_tracker(&tracker).unwrap();

        db.set_pinned(tracker.id, true).unwrap();
        db.set_category(tracker.id, "Evening").unwrap();

        let loaded = db.get_tracker(tracker.id).unwrap().unwrap();
        assert!(loaded.pinned);
        assert_eq!(loaded.category, "Evening");

        assert!(matches!(
            db.set_pinned(TrackerId::new(), true),
            Err(PersistenceError::TrackerNotFound(_))
        ));
    }

    #[test]
    fn records_are_unique_per_day() {
        let mut db = TrackerDb::open_memory().unwrap();
        let tracker = habit("Read", "Study");
        db.add_tracker(&tracker).unwrap();

        assert!(db.add_record(tracker.id, day(1)).unwrap());
        assert!(!db.add_record(tracker.id, day(1)).unwrap());
        assert!(db.add_record(tracker.id, day(3)).unwrap());

        assert_eq!(db.record_count(tracker.id).unwrap(), 2);
        assert!(db.record_exists(tracker.id, day(1)).unwrap());
        assert!(!db.record_exists(tracker.id, day(2)).unwrap());

        assert!(db.remove_record(tracker.id, day(1)).unwrap());
        assert!(!db.remove_record(tracker.id, day(1)).unwrap());
        assert_eq!(db.record_count(tracker.id).unwrap(), 1);
    }

    #[test]
    fn delete_cascades_and_unknown_id_leaves_state() {
        let mut db = TrackerDb::open_memory().unwrap();
        let read = habit("Read", "Study");
        let walk = habit("Walk", "Health");
        db.add_tracker(&read).unwrap();
        db.add_tracker(&walk).unwrap();
        db.add_record(read.id, day(1)).unwrap();
        db.add_record(walk.id, day(1)).unwrap();

        assert!(matches!(
            db.delete_tracker(TrackerId::new()),
            Err(PersistenceError::TrackerNotFound(_))
        ));
        assert_eq!(db.all_records().unwrap().len(), 2);

        db.delete_tracker(read.id).unwrap();
        assert_eq!(db.record_count(read.id).unwrap(), 0);
        assert_eq!(db.all_records().unwrap().len(), 1);
    }

    #[test]
    fn fetch_all_orders_categories_by_name() {
        let mut db = TrackerDb::open_memory().unwrap();
        db.add_tracker(&habit("Walk", "Health")).unwrap();
        db.add_tracker(&habit("Read", "Study")).unwrap();
        db.add_tracker(&habit("Floss", "Health")).unwrap();

        let categories = db.fetch_all().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Health");
        let names: Vec<_> = categories[0].trackers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Walk", "Floss"]);
    }

    #[test]
    fn reopen_file_database_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitrack.db");
        let tracker = habit("Read", "Study");
        {
            let mut db = TrackerDb::open_at(&path).unwrap();
            db.add_tracker(&tracker).unwrap();
            db.add_record(tracker.id, day(8)).unwrap();
        }
        let db = TrackerDb::open_at(&path).unwrap();
        assert_eq!(db.record_count(tracker.id).unwrap(), 1);
        assert_eq!(
            migrations::get_schema_version(db.conn()),
            migrations::SCHEMA_VERSION
        );
    }
}
