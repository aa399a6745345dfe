//! Visibility filter.
//!
//! Turns the repository's categories into what the tracker list shows for a
//! date: trackers due that weekday, pinned ones pulled into a leading
//! synthetic category, narrowed by search text and filter mode, then sorted.
//!
//! The stages run in this order:
//! 1. day filter on the effective date's weekday
//! 2. pin segregation
//! 3. case-insensitive name search
//! 4. completion mode
//! 5. sort by name, except the pinned category which keeps accumulation order
//!
//! A category never survives a stage empty.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, ValidationError};
use crate::storage::RecordStore;
use crate::tracker::{Tracker, TrackerCategory, TrackerId};

/// Which trackers the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Everything due on the selected date
    #[default]
    All,
    /// Everything due on the current real-world date
    Today,
    /// Due and completed on the date
    Finished,
    /// Due and not yet completed on the date
    Unfinished,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Today,
        FilterMode::Finished,
        FilterMode::Unfinished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Today => "today",
            FilterMode::Finished => "finished",
            FilterMode::Unfinished => "unfinished",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownFilterMode(s.to_string()))
    }
}

/// Answers whether a tracker was completed on a day.
///
/// Every [`RecordStore`] is one.
pub trait CompletionSource {
    fn is_done(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError>;
}

impl<S: RecordStore + ?Sized> CompletionSource for S {
    fn is_done(&self, id: TrackerId, day: NaiveDate) -> Result<bool, PersistenceError> {
        self.record_exists(id, day)
    }
}

/// View state the filter runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityQuery {
    pub selected_date: NaiveDate,
    /// The current real-world date, used by [`FilterMode::Today`].
    pub today: NaiveDate,
    pub search: Option<String>,
    pub mode: FilterMode,
}

impl VisibilityQuery {
    pub fn new(selected_date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            selected_date,
            today,
            search: None,
            mode: FilterMode::All,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Date that scheduling and completion are evaluated on.
    pub fn effective_date(&self) -> NaiveDate {
        match self.mode {
            FilterMode::Today => self.today,
            _ => self.selected_date,
        }
    }

    /// Lowercased search needle, `None` when the search box is blank.
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Whether a completion mark may be set or cleared for `date`.
///
/// Future dates are locked.
pub fn can_mark(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

/// Run the filter pipeline.
///
/// `pinned_label` names the synthetic leading category. Errors from the
/// completion source are returned unchanged.
pub fn visible_categories<C>(
    categories: &[TrackerCategory],
    query: &VisibilityQuery,
    pinned_label: &str,
    completion: &C,
) -> Result<Vec<TrackerCategory>, PersistenceError>
where
    C: CompletionSource + ?Sized,
{
    let date = query.effective_date();
    let needle = query.needle();

    // 1 + 2: due on the date, pinned ones set aside in accumulation order
    let mut pinned_trackers: Vec<Tracker> = Vec::new();
    let mut regular: Vec<TrackerCategory> = Vec::new();
    for category in categories {
        let mut kept = Vec::new();
        for tracker in category.trackers.iter().filter(|t| t.is_due_on(date)) {
            if tracker.pinned {
                pinned_trackers.push(tracker.clone());
            } else {
                kept.push(tracker.clone());
            }
        }
        if !kept.is_empty() {
            regular.push(TrackerCategory::new(category.name.clone(), kept));
        }
    }
    // zero or one category
    let mut pinned = vec![TrackerCategory::new(pinned_label, pinned_trackers)];
    pinned.retain(|c| !c.is_empty());

    for group in [&mut pinned, &mut regular] {
        // 3: search
        if let Some(needle) = needle.as_deref() {
            retain_trackers(group, |t| Ok(t.name.to_lowercase().contains(needle)))?;
        }

        // 4: mode
        match query.mode {
            FilterMode::All | FilterMode::Today => {}
            FilterMode::Finished => retain_trackers(group, |t| completion.is_done(t.id, date))?,
            FilterMode::Unfinished => {
                retain_trackers(group, |t| completion.is_done(t.id, date).map(|done| !done))?
            }
        }
    }

    // 5: sort
    for category in &mut regular {
        category.trackers.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pinned.extend(regular);
    Ok(pinned)
}

fn retain_trackers<F>(categories: &mut Vec<TrackerCategory>, mut keep: F) -> Result<(), PersistenceError>
where
    F: FnMut(&Tracker) -> Result<bool, PersistenceError>,
{
    for category in categories.iter_mut() {
        let mut kept = Vec::with_capacity(category.trackers.len());
        for tracker in category.trackers.drain(..) {
            if keep(&tracker)? {
                kept.push(tracker);
            }
        }
        category.trackers = kept;
    }
    categories.retain(|c| !c.is_empty());
    Ok(())
}

/// One tracker row as the list renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerCell {
    pub tracker: Tracker,
    /// Completed on the effective date
    pub done_on_date: bool,
    /// All-time number of completed days
    pub completed_days: u32,
    /// Whether the completion button is enabled
    pub can_mark: bool,
}

/// A category section of rendered cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySection {
    pub name: String,
    pub cells: Vec<TrackerCell>,
}

/// Run the filter and decorate each visible tracker with its completion state.
pub fn visible_cells<S>(
    categories: &[TrackerCategory],
    query: &VisibilityQuery,
    pinned_label: &str,
    records: &S,
) -> Result<Vec<CategorySection>, PersistenceError>
where
    S: RecordStore + ?Sized,
{
    let date = query.effective_date();
    let markable = can_mark(date, query.today);
    visible_categories(categories, query, pinned_label, records)?
        .into_iter()
        .map(|category| -> Result<CategorySection, PersistenceError> {
            let cells = category
                .trackers
                .into_iter()
                .map(|tracker| -> Result<TrackerCell, PersistenceError> {
                    Ok(TrackerCell {
                        done_on_date: records.record_exists(tracker.id, date)?,
                        completed_days: records.record_count(tracker.id)?,
                        can_mark: markable,
                        tracker,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CategorySection {
                name: category.name,
                cells,
            })
        })
        .collect()
}
