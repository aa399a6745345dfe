use chrono::NaiveDate;
use clap::Subcommand;
use habitrack_core::{RecordStore, TrackerId};
use serde_json::json;

use super::open_session;

#[derive(Subcommand)]
pub enum RecordAction {
    /// Mark a tracker done
    Mark {
        /// Tracker ID
        id: TrackerId,
        /// Day to mark, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Clear a completion mark
    Unmark {
        /// Tracker ID
        id: TrackerId,
        /// Day to clear, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// All-time number of completed days
    Count {
        /// Tracker ID
        id: TrackerId,
    },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    match action {
        RecordAction::Mark { id, date } => {
            let day = date.unwrap_or_else(|| session.today());
            let changed = session.mark_completed(id, day)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "id": id, "day": day, "done": true, "changed": changed }))?
            );
        }
        RecordAction::Unmark { id, date } => {
            let day = date.unwrap_or_else(|| session.today());
            let changed = session.unmark_completed(id, day)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "id": id, "day": day, "done": false, "changed": changed }))?
            );
        }
        RecordAction::Count { id } => {
            session.tracker(id)?;
            let count = session.store().record_count(id)?;
            println!("{count}");
        }
    }
    Ok(())
}
