//! Driver Monitor Replay
//!
//! Drives the DMS engine from JSON-lines detector output and writes one
//! report line per frame to stdout. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod replay;
pub mod settings;

pub use replay::{replay, FrameReport, ReplayError, ReplayEvent, ReplaySession, ReplayStats};
pub use settings::{CaptureConfig, LoggingConfig, MonitorSettings};

/// Input path meaning standard input
pub const STDIN_INPUT: &str = "-";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "dms-monitor", version, about = "Replay face/hand landmark streams through the driver monitor")]
pub struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON-lines input file, or `-` for stdin
    #[arg(short, long, default_value = STDIN_INPUT)]
    pub input: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Initialize logging
pub fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Replay `input` with `settings`, writing reports to stdout
pub async fn run(settings: &MonitorSettings, input: &str) -> anyhow::Result<ReplayStats> {
    info!(
        "Frame size {:?}, alert duration {} ms",
        settings.capture.frame_size(),
        settings.ledger.alert_duration_ms
    );

    let mut session = ReplaySession::new(settings, std::io::stdout())?;
    let stats = if input == STDIN_INPUT {
        info!("Reading events from stdin");
        replay(BufReader::new(tokio::io::stdin()), &mut session).await?
    } else {
        info!("Reading events from {}", input);
        let file = tokio::fs::File::open(input).await?;
        replay(BufReader::new(file), &mut session).await?
    };

    info!(
        "Processed {} frames, {} calibrations, {} skipped",
        stats.frames, stats.calibrations, stats.skipped
    );
    Ok(stats)
}
