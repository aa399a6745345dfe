//! Tracker domain types.
//!
//! A [`Tracker`] is a habit or event with a weekly schedule. Completion is
//! stored separately as [`TrackerRecord`]s, one per tracker per calendar day.
//! Categories are not stored objects: [`TrackerCategory`] is a grouping derived
//! from each tracker's `category` field.

mod day;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schedule::Schedule;

pub use day::IntoCalendarDay;

/// Number of entries in the color and emoji palettes.
pub const PALETTE_SIZE: u8 = 18;

/// Stable tracker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(Uuid);

impl TrackerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TrackerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Kind of tracker chosen on the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    /// Recurring habit on user-selected weekdays
    #[default]
    Habit,
    /// Irregular event, due every day
    Event,
}

impl TrackerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerKind::Habit => "habit",
            TrackerKind::Event => "event",
        }
    }
}

impl FromStr for TrackerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "habit" => Ok(TrackerKind::Habit),
            "event" => Ok(TrackerKind::Event),
            other => Err(ValidationError::InvalidValue {
                field: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A habit or event being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub name: String,
    pub color: u8,
    pub emoji: u8,
    pub schedule: Schedule,
    pub kind: TrackerKind,
    pub pinned: bool,
    pub category: String,
}

impl Tracker {
    /// Whether the tracker is due on the weekday of `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.schedule.is_due_on(date)
    }
}

/// Tracker creation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTracker {
    pub name: String,
    pub color: u8,
    pub emoji: u8,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub kind: TrackerKind,
    pub category: String,
}

impl NewTracker {
    pub fn habit(name: impl Into<String>, category: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            name: name.into(),
            schedule,
            kind: TrackerKind::Habit,
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn event(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TrackerKind::Event,
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_emoji(mut self, emoji: u8) -> Self {
        self.emoji = emoji;
        self
    }

    /// Validate the form and produce an unpinned tracker with a fresh id.
    ///
    /// Events are scheduled on every day regardless of the submitted schedule.
    ///
    /// # Errors
    /// Returns a `ValidationError` for an empty name or category, an
    /// out-of-range palette index, or a habit without any weekday.
    pub fn build(self) -> Result<Tracker, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        check_palette("color", self.color)?;
        check_palette("emoji", self.emoji)?;

        let schedule = match self.kind {
            TrackerKind::Event => Schedule::every_day(),
            TrackerKind::Habit if self.schedule.is_empty() => {
                return Err(ValidationError::EmptySchedule)
            }
            TrackerKind::Habit => self.schedule,
        };

        Ok(Tracker {
            id: TrackerId::new(),
            name,
            color: self.color,
            emoji: self.emoji,
            schedule,
            kind: self.kind,
            pinned: false,
            category,
        })
    }
}

fn check_palette(field: &'static str, index: u8) -> Result<(), ValidationError> {
    if index >= PALETTE_SIZE {
        return Err(ValidationError::IndexOutOfRange {
            field,
            index,
            max: PALETTE_SIZE - 1,
        });
    }
    Ok(())
}

/// One completion mark: tracker `tracker_id` was done on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackerRecord {
    pub tracker_id: TrackerId,
    pub day: NaiveDate,
}

impl TrackerRecord {
    pub fn new(tracker_id: TrackerId, day: impl IntoCalendarDay) -> Self {
        Self {
            tracker_id,
            day: day.calendar_day(),
        }
    }
}

/// Trackers sharing a category name, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerCategory {
    pub name: String,
    pub trackers: Vec<Tracker>,
}

impl TrackerCategory {
    pub fn new(name: impl Into<String>, trackers: Vec<Tracker>) -> Self {
        Self {
            name: name.into(),
            trackers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::WeekDay;

    fn mon_wed() -> Schedule {
        [WeekDay::Monday, WeekDay::Wednesday].into_iter().collect()
    }

    #[test]
    fn build_habit_keeps_schedule() {
        let tracker = NewTracker::habit("  Read  ", "Study", mon_wed())
            .with_color(3)
            .with_emoji(5)
            .build()
            .unwrap();
        assert_eq!(tracker.name, "Read");
        assert_eq!(tracker.schedule, mon_wed());
        assert_eq!(tracker.kind, TrackerKind::Habit);
        assert!(!tracker.pinned);
        assert_eq!(tracker.color, 3);
    }

    #[test]
    fn build_event_is_scheduled_every_day() {
        let tracker = NewTracker::event("Dentist", "Health").build().unwrap();
        assert_eq!(tracker.schedule, Schedule::every_day());
        assert_eq!(tracker.kind, TrackerKind::Event);
    }

    #[test]
    fn build_rejects_invalid_forms() {
        assert_eq!(
            NewTracker::habit("  ", "Study", mon_wed()).build(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            NewTracker::habit("Read", "", mon_wed()).build(),
            Err(ValidationError::EmptyCategory)
        );
        assert_eq!(
            NewTracker::habit("Read", "Study", Schedule::new()).build(),
            Err(ValidationError::EmptySchedule)
        );
        assert_eq!(
            NewTracker::habit("Read", "Study", mon_wed())
                .with_color(PALETTE_SIZE)
                .build(),
            Err(ValidationError::IndexOutOfRange {
                field: "color",
                index: PALETTE_SIZE,
                max: PALETTE_SIZE - 1,
            })
        );
    }

    #[test]
    fn tracker_ids_parse_from_display() {
        let id = TrackerId::new();
        assert_eq!(id.to_string().parse::<TrackerId>().unwrap(), id);
        assert!("not-a-uuid".parse::<TrackerId>().is_err());
    }

    #[test]
    fn record_normalizes_day() {
        let id = TrackerId::new();
        let morning = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        let evening = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(22, 5, 0)
            .unwrap();
        assert_eq!(TrackerRecord::new(id, morning), TrackerRecord::new(id, evening));
    }
}
