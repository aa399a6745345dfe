use chrono::NaiveDate;
use clap::Args;
use habitrack_core::FilterMode;
use serde_json::json;

use super::open_session;

#[derive(Args)]
pub struct ViewArgs {
    /// Date to show, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Only trackers whose name contains this text
    #[arg(long)]
    search: Option<String>,
    /// all, today, finished or unfinished (default: view.default_filter)
    #[arg(long)]
    filter: Option<FilterMode>,
}

pub fn run(args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;

    if let Some(date) = args.date {
        session.select_date(date)?;
    }
    if let Some(mode) = args.filter {
        session.set_filter(mode)?;
    }
    session.set_search(args.search)?;

    let query = session.query();
    let sections = session.cells()?;
    let output = json!({
        "date": query.effective_date(),
        "filter": query.mode,
        "sections": sections,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
