//! Day-level scans over the record history.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::schedule::WeekDay;
use crate::tracker::{Tracker, TrackerId, TrackerRecord};

/// Number of calendar days on which every tracker due that weekday was done.
///
/// For each distinct recorded day, the count of distinct trackers completed
/// that day must equal the count of trackers scheduled on its weekday.
/// The comparison is exact: completions of trackers not due that day still
/// count toward the total.
pub fn ideal_days(trackers: &[Tracker], records: &[TrackerRecord]) -> u32 {
    let mut scheduled: HashMap<WeekDay, usize> = HashMap::new();
    for tracker in trackers {
        for day in tracker.schedule.iter() {
            *scheduled.entry(day).or_default() += 1;
        }
    }

    let mut completed: BTreeMap<NaiveDate, BTreeSet<TrackerId>> = BTreeMap::new();
    for record in records {
        completed.entry(record.day).or_default().insert(record.tracker_id);
    }

    completed
        .iter()
        .filter(|(day, done)| {
            let due = scheduled.get(&WeekDay::of(**day)).copied().unwrap_or(0);
            done.len() == due
        })
        .count() as u32
}

/// Longest run of consecutive calendar days that each hold at least one record.
pub fn best_period(records: &[TrackerRecord]) -> u32 {
    let days: BTreeSet<NaiveDate> = records.iter().map(|r| r.day).collect();

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}
