use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use roomie_match::batch::{run_batch, BatchInput, Mode};
use roomie_match::config::{LoggingSettings, Settings};
use roomie_match::Matcher;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "roomie-match",
    about = "Rank roommate and property-share candidates for one user",
    version
)]
struct Cli {
    /// Batch file with the acting profile, preferences and candidate records
    #[arg(long, short)]
    input: PathBuf,
    /// Which matcher(s) to run
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,
    /// Configuration file; defaults to config/default plus config/local
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    init_logging(&settings.logging);

    info!("Configuration loaded, running {:?} matching", cli.mode);

    let raw = fs::read_to_string(&cli.input).map_err(|e| {
        error!("Failed to read {}: {}", cli.input.display(), e);
        e
    })?;
    let batch: BatchInput = serde_json::from_str(&raw)?;

    let matcher = Matcher::new(&settings);
    let report = run_batch(&matcher, batch, cli.mode)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
