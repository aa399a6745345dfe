use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitrack-cli", version, about = "Habitrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tracker management
    Tracker {
        #[command(subcommand)]
        action: commands::tracker::TrackerAction,
    },
    /// Completion marks
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Show the tracker list for a date
    View(commands::view::ViewArgs),
    /// Statistics over the whole history
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HABITRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tracker { action } => commands::tracker::run(action),
        Commands::Record { action } => commands::record::run(action),
        Commands::View(args) => commands::view::run(args),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
