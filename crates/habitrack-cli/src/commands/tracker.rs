//! Tracker management commands for CLI.

use clap::Subcommand;
use habitrack_core::{Config, NewTracker, Schedule, TrackerId, TrackerKind, TrackerRepository};
use serde_json::json;

use super::open_session;

#[derive(Subcommand)]
pub enum TrackerAction {
    /// Create a new tracker
    Create {
        /// Tracker name
        name: String,
        /// Category name (default: trackers.default_category)
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated weekdays, e.g. "mon,wed" or "all"
        #[arg(long)]
        days: Option<String>,
        /// Irregular event, due every day
        #[arg(long)]
        event: bool,
        /// Color palette index
        #[arg(long, default_value = "0")]
        color: u8,
        /// Emoji palette index
        #[arg(long, default_value = "0")]
        emoji: u8,
    },
    /// List trackers grouped by category
    List,
    /// Delete a tracker and its records
    Delete {
        /// Tracker ID
        id: TrackerId,
    },
    /// Pin a tracker to the top of the list
    Pin {
        /// Tracker ID
        id: TrackerId,
    },
    /// Unpin a tracker
    Unpin {
        /// Tracker ID
        id: TrackerId,
    },
    /// Move a tracker to another category
    Move {
        /// Tracker ID
        id: TrackerId,
        /// New category name
        category: String,
    },
}

pub fn run(action: TrackerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        TrackerAction::Create {
            name,
            category,
            days,
            event,
            color,
            emoji,
        } => {
            let category =
                category.unwrap_or_else(|| Config::load_or_default().trackers.default_category);
            let schedule = match days {
                Some(list) => Schedule::parse_list(&list)?,
                None => Schedule::every_day(),
            };
            let form = NewTracker {
                name,
                color,
                emoji,
                schedule,
                kind: if event { TrackerKind::Event } else { TrackerKind::Habit },
                category,
            };
            let tracker = session.create_tracker(form)?;
            println!("{}", serde_json::to_string_pretty(&tracker)?);
        }
        TrackerAction::List => {
            let categories = session.store().fetch_all()?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        TrackerAction::Delete { id } => {
            session.delete_tracker(id)?;
            print_json(&json!({ "id": id, "deleted": true }))?;
        }
        TrackerAction::Pin { id } => {
            session.set_pinned(id, true)?;
            print_json(&json!({ "id": id, "pinned": true }))?;
        }
        TrackerAction::Unpin { id } => {
            session.set_pinned(id, false)?;
            print_json(&json!({ "id": id, "pinned": false }))?;
        }
        TrackerAction::Move { id, category } => {
            session.move_tracker(id, &category)?;
            print_json(&json!({ "id": id, "category": category.trim() }))?;
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
