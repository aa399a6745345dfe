use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter::CategorySection;
use crate::stats::StatisticsEntry;
use crate::tracker::TrackerId;

/// Every state change in a session produces an Event.
/// Observers receive them synchronously, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TrackerCreated {
        id: TrackerId,
        category: String,
    },
    TrackerDeleted {
        id: TrackerId,
    },
    TrackerPinned {
        id: TrackerId,
        pinned: bool,
    },
    TrackerMoved {
        id: TrackerId,
        category: String,
    },
    RecordToggled {
        id: TrackerId,
        day: NaiveDate,
        done: bool,
    },
    /// The visible list was recomputed.
    CategoriesChanged {
        sections: Vec<CategorySection>,
    },
    /// Statistics were recomputed after trackers or records changed.
    StatisticsChanged {
        entries: Vec<StatisticsEntry>,
    },
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Event)>;

/// Observer list with synchronous publish.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    pub fn publish(&mut self, event: &Event) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_reaches_subscribers_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();
        let sink = Rc::clone(&seen);
        let sub = observers.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let event = Event::TrackerDeleted { id: TrackerId::new() };
        observers.publish(&event);
        assert_eq!(seen.borrow().as_slice(), [event.clone()]);

        assert!(observers.unsubscribe(sub));
        assert!(!observers.unsubscribe(sub));
        observers.publish(&event);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::StatisticsChanged { entries: Vec::new() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StatisticsChanged");
    }
}
