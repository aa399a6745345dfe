use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::streaks::{best_period, ideal_days};
use crate::error::PersistenceError;
use crate::storage::{RecordStore, TrackerRepository};
use crate::tracker::{Tracker, TrackerRecord};

/// Row kinds on the statistics screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    /// Longest run of consecutive days with any completion
    BestPeriod,
    /// Days on which every due tracker was completed
    IdealDays,
    /// Total completion marks
    FinishedTrackers,
    /// Completions per recorded day, rounded down
    AverageValue,
}

impl StatisticKind {
    pub fn title(&self) -> &'static str {
        match self {
            StatisticKind::BestPeriod => "Best period",
            StatisticKind::IdealDays => "Ideal days",
            StatisticKind::FinishedTrackers => "Trackers completed",
            StatisticKind::AverageValue => "Average value",
        }
    }
}

/// One statistics row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsEntry {
    pub kind: StatisticKind,
    pub value: u32,
}

/// Aggregated statistics over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub total_trackers: u32,
    pub finished: u32,
    pub ideal_days: u32,
    pub best_period: u32,
    pub average: u32,
}

impl StatisticsReport {
    /// Rows for display. Empty when no trackers exist.
    pub fn entries(&self) -> Vec<StatisticsEntry> {
        if self.total_trackers == 0 {
            return Vec::new();
        }
        [
            (StatisticKind::BestPeriod, self.best_period),
            (StatisticKind::IdealDays, self.ideal_days),
            (StatisticKind::FinishedTrackers, self.finished),
            (StatisticKind::AverageValue, self.average),
        ]
        .into_iter()
        .map(|(kind, value)| StatisticsEntry { kind, value })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total_trackers == 0
    }
}

/// Computes [`StatisticsReport`]s.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate over every tracker (no date, search or pin filtering) and
    /// every record.
    pub fn aggregate(&self, trackers: &[Tracker], records: &[TrackerRecord]) -> StatisticsReport {
        if trackers.is_empty() {
            return StatisticsReport::default();
        }

        let recorded_days: BTreeSet<NaiveDate> = records.iter().map(|r| r.day).collect();
        let finished = records.len() as u32;
        let average = match recorded_days.len() as u32 {
            0 => 0,
            days => finished / days,
        };

        let report = StatisticsReport {
            total_trackers: trackers.len() as u32,
            finished,
            ideal_days: ideal_days(trackers, records),
            best_period: best_period(records),
            average,
        };
        debug!(?report, "statistics aggregated");
        report
    }

    /// Read everything from a store and aggregate it.
    ///
    /// # Errors
    /// Propagates the store's persistence errors unchanged.
    pub fn from_store<S>(&self, store: &S) -> Result<StatisticsReport, PersistenceError>
    where
        S: TrackerRepository + RecordStore + ?Sized,
    {
        let trackers: Vec<Tracker> = store
            .fetch_all()?
            .into_iter()
            .flat_map(|category| category.trackers)
            .collect();
        let records = store.all_records()?;
        Ok(self.aggregate(&trackers, &records))
    }
}
