pub mod config;
pub mod record;
pub mod stats;
pub mod tracker;
pub mod view;

use habitrack_core::{Config, SystemClock, TrackerDb, TrackerSession};

/// Open the on-disk store inside a session configured from `config.toml`.
pub(crate) fn open_session() -> Result<TrackerSession<TrackerDb>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = TrackerDb::open()?;
    Ok(TrackerSession::with_config(db, SystemClock, &config))
}
