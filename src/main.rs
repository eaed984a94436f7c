use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use station_stats::{Cli, RunConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();

    let config = RunConfig::from(Cli::parse());
    let start = std::time::Instant::now();

    let stdout = std::io::stdout().lock();
    let summary = station_stats::run(&config, BufWriter::new(stdout))
        .inspect_err(|e| error!(error = %e, "run failed"))
        .context("no report produced")?;

    info!(
        lines = summary.lines,
        keys = summary.keys,
        elapsed = ?start.elapsed(),
        "report written"
    );
    Ok(())
}
