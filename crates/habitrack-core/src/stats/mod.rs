//! Statistics module for Habitrack
//!
//! Aggregates the full tracker list and record history into the rows of the
//! statistics screen: best period, ideal days, finished trackers and the
//! average number of completions per active day.

mod aggregator;
mod streaks;

pub use aggregator::{StatisticKind, StatisticsAggregator, StatisticsEntry, StatisticsReport};
pub use streaks::{best_period, ideal_days};
