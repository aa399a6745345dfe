//! # Habitrack Core Library
//!
//! This library provides the core logic for Habitrack, a habit tracker.
//! Every operation is available through the standalone CLI binary; any UI is a
//! thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Trackers**: habits and events with a weekly schedule, grouped by
//!   category name
//! - **Storage**: a repository/record-store contract with in-memory and
//!   SQLite implementations, plus TOML-based configuration
//! - **Filter**: the per-date visible list (day, pin, search and mode stages)
//! - **Statistics**: best period, ideal days, completions and averages
//! - **Session**: the composition root that owns a store and publishes
//!   recomputed state to observers after each change
//!
//! ## Key Components
//!
//! - [`TrackerSession`]: view state, mutations and observers
//! - [`TrackerDb`]: SQLite persistence
//! - [`visible_categories`]: the filter pipeline
//! - [`StatisticsAggregator`]: history-wide statistics

pub mod error;
pub mod events;
pub mod filter;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use error::{ConfigError, CoreError, PersistenceError, ValidationError};
pub use events::{Event, Observers, SubscriptionId};
pub use filter::{
    can_mark, visible_categories, visible_cells, CategorySection, CompletionSource, FilterMode,
    TrackerCell, VisibilityQuery,
};
pub use schedule::{code_to_days, days_to_code, schedule_contains, Schedule, WeekDay};
pub use session::{Clock, FixedClock, SystemClock, TrackerSession};
pub use stats::{StatisticKind, StatisticsAggregator, StatisticsEntry, StatisticsReport};
pub use storage::{Config, MemoryStore, RecordStore, TrackerDb, TrackerRepository};
pub use tracker::{
    IntoCalendarDay, NewTracker, Tracker, TrackerCategory, TrackerId, TrackerKind, TrackerRecord,
    PALETTE_SIZE,
};
