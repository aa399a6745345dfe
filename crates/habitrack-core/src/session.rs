//! Tracker session: the composition root.
//!
//! A [`TrackerSession`] owns one store, a clock and the current view state
//! (selected date, search text, filter mode). Every mutation goes through
//! `&mut self`, so writes are serialized and reads always see them. After each
//! change the visible list (and, when trackers or records changed, the
//! statistics) are recomputed and pushed to subscribers before the call
//! returns.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{CoreError, PersistenceError, Result, ValidationError};
use crate::events::{Event, Observers, SubscriptionId};
use crate::filter::{
    can_mark, visible_categories, visible_cells, CategorySection, FilterMode, VisibilityQuery,
};
use crate::stats::{StatisticsAggregator, StatisticsReport};
use crate::storage::{Config, RecordStore, TrackerRepository};
use crate::tracker::{IntoCalendarDay, NewTracker, Tracker, TrackerCategory, TrackerId};

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// What a mutation invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    List,
    ListAndStatistics,
}

pub struct TrackerSession<S, C = SystemClock> {
    store: S,
    clock: C,
    aggregator: StatisticsAggregator,
    pinned_label: String,
    selected_date: NaiveDate,
    search: Option<String>,
    mode: FilterMode,
    observers: Observers,
}

impl<S, C> TrackerSession<S, C>
where
    S: TrackerRepository + RecordStore,
    C: Clock,
{
    /// Start a session on today's date with default view settings.
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, &Config::default())
    }

    pub fn with_config(store: S, clock: C, config: &Config) -> Self {
        let selected_date = clock.today();
        Self {
            store,
            clock,
            aggregator: StatisticsAggregator::new(),
            pinned_label: config.view.pinned_label.clone(),
            selected_date,
            search: None,
            mode: config.view.default_filter,
            observers: Observers::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.mode
    }

    pub fn query(&self) -> VisibilityQuery {
        VisibilityQuery {
            selected_date: self.selected_date,
            today: self.clock.today(),
            search: self.search.clone(),
            mode: self.mode,
        }
    }

    /// Visible categories for the current view state.
    pub fn visible(&self) -> Result<Vec<TrackerCategory>> {
        let categories = self.store.fetch_all()?;
        Ok(visible_categories(
            &categories,
            &self.query(),
            &self.pinned_label,
            &self.store,
        )?)
    }

    /// Visible categories with per-tracker completion state.
    pub fn cells(&self) -> Result<Vec<CategorySection>> {
        let categories = self.store.fetch_all()?;
        Ok(visible_cells(
            &categories,
            &self.query(),
            &self.pinned_label,
            &self.store,
        )?)
    }

    pub fn statistics(&self) -> Result<StatisticsReport> {
        Ok(self.aggregator.from_store(&self.store)?)
    }

    pub fn tracker(&self, id: TrackerId) -> Result<Tracker> {
        self.store
            .get_tracker(id)?
            .ok_or(CoreError::Persistence(PersistenceError::TrackerNotFound(id)))
    }

    /// Validate the creation form and store the new tracker.
    ///
    /// Once the store accepts the tracker the call succeeds; a failure while
    /// republishing the list is logged, not returned.
    pub fn create_tracker(&mut self, form: NewTracker) -> Result<Tracker> {
        let tracker = form.build()?;
        self.store.add_tracker(&tracker)?;
        info!(id = %tracker.id, name = %tracker.name, "tracker created");
        self.publish(Event::TrackerCreated {
            id: tracker.id,
            category: tracker.category.clone(),
        });
        self.refresh_after_write(Refresh::ListAndStatistics);
        Ok(tracker)
    }

    /// Delete a tracker and all of its records.
    pub fn delete_tracker(&mut self, id: TrackerId) -> Result<()> {
        self.store.delete_tracker(id)?;
        info!(%id, "tracker deleted");
        self.publish(Event::TrackerDeleted { id });
        self.refresh_after_write(Refresh::ListAndStatistics);
        Ok(())
    }

    pub fn set_pinned(&mut self, id: TrackerId, pinned: bool) -> Result<()> {
        self.store.set_pinned(id, pinned)?;
        self.publish(Event::TrackerPinned { id, pinned });
        self.refresh_after_write(Refresh::List);
        Ok(())
    }

    /// Reassign a tracker to another category.
    pub fn move_tracker(&mut self, id: TrackerId, category: &str) -> Result<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }
        self.store.set_category(id, category)?;
        self.publish(Event::TrackerMoved {
            id,
            category: category.to_string(),
        });
        self.refresh_after_write(Refresh::List);
        Ok(())
    }

    pub fn select_date(&mut self, day: impl IntoCalendarDay) -> Result<()> {
        self.selected_date = day.calendar_day();
        self.refresh(Refresh::List)
    }

    pub fn set_search(&mut self, search: Option<String>) -> Result<()> {
        self.search = search;
        self.refresh(Refresh::List)
    }

    pub fn set_filter(&mut self, mode: FilterMode) -> Result<()> {
        self.mode = mode;
        self.refresh(Refresh::List)
    }

    /// Mark `id` done on `day`. Returns `false` if it already was.
    ///
    /// # Errors
    /// `FutureDate` for days after today, `TrackerNotFound` for unknown ids.
    pub fn mark_completed(&mut self, id: TrackerId, day: impl IntoCalendarDay) -> Result<bool> {
        self.set_completion(id, day.calendar_day(), true)
    }

    /// Clear the mark for `id` on `day`. Returns `false` if there was none.
    ///
    /// # Errors
    /// `FutureDate` for days after today, `TrackerNotFound` for unknown ids.
    pub fn unmark_completed(&mut self, id: TrackerId, day: impl IntoCalendarDay) -> Result<bool> {
        self.set_completion(id, day.calendar_day(), false)
    }

    /// Flip completion of `id` on the date the list currently shows.
    /// Returns the new state.
    pub fn toggle_completion(&mut self, id: TrackerId) -> Result<bool> {
        let day = self.query().effective_date();
        let done = self.store.record_exists(id, day)?;
        self.set_completion(id, day, !done)?;
        Ok(!done)
    }

    fn set_completion(&mut self, id: TrackerId, day: NaiveDate, done: bool) -> Result<bool> {
        let today = self.clock.today();
        if !can_mark(day, today) {
            return Err(CoreError::FutureDate { day, today });
        }
        // unknown ids must fail even when there is nothing to remove
        self.tracker(id)?;

        let changed = if done {
            self.store.add_record(id, day)?
        } else {
            self.store.remove_record(id, day)?
        };
        debug!(%id, %day, done, changed, "completion updated");
        if changed {
            self.publish(Event::RecordToggled { id, day, done });
            self.refresh_after_write(Refresh::ListAndStatistics);
        }
        Ok(changed)
    }

    fn publish(&mut self, event: Event) {
        self.observers.publish(&event);
    }

    /// Recompute and push derived state. Skipped when nobody listens, since
    /// reads never use a cached copy.
    fn refresh(&mut self, what: Refresh) -> Result<()> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let sections = self.cells()?;
        self.publish(Event::CategoriesChanged { sections });
        if what == Refresh::ListAndStatistics {
            let entries = self.statistics()?.entries();
            self.publish(Event::StatisticsChanged { entries });
        }
        Ok(())
    }

    /// Refresh after a committed write. Failures are logged; the write's
    /// result stands.
    fn refresh_after_write(&mut self, what: Refresh) {
        if let Err(e) = self.refresh(what) {
            warn!(error = %e, "refresh after write failed");
        }
    }
}
