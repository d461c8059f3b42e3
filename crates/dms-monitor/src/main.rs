//! Driver Monitor - Main Entry Point

use clap::Parser;
use dms_monitor::{init_logging, run, Cli, MonitorSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = MonitorSettings::load(cli.config.as_deref())?;
    if cli.json_logs {
        settings.logging.json = true;
    }
    init_logging(&settings.logging);

    info!("=== Driver Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    run(&settings, &cli.input).await?;

    Ok(())
}
