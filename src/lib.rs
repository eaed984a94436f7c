//! Streaming per-key min/mean/max over `key;value` lines.
//!
//! A run reads every source in order into an [`Aggregator`], then turns it
//! into a sorted [`Report`] that is written once. Any error before that point
//! means no report at all.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod input;
pub mod parallel;
pub mod progress;
pub mod record;
pub mod report;
pub mod stats;

use std::io::Write;

use tracing::{debug, info};

pub use aggregate::Aggregator;
pub use config::{Cli, RunConfig};
pub use error::{Error, RecordError, Result};
pub use input::Source;
pub use progress::Progress;
pub use record::{parse_record, Record};
pub use report::Report;
pub use stats::{AggregationTable, StationStats};

/// What a successful run produced, besides the report line itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub lines: u64,
    pub keys: usize,
}

/// Consumes every source, then writes the report to `out`.
pub fn run<W: Write>(config: &RunConfig, out: W) -> Result<Summary> {
    let (report, summary) = collect(config)?;
    report.emit(out)?;
    Ok(summary)
}

/// Accumulating phase only: returns the finished report without writing it.
pub fn collect(config: &RunConfig) -> Result<(Report, Summary)> {
    let (report, lines) = accumulate(config)?;
    let summary = Summary { lines, keys: report.len() };
    info!(lines, keys = summary.keys, "input consumed");
    Ok((report, summary))
}

fn accumulate(config: &RunConfig) -> Result<(Report, u64)> {
    info!(sources = config.sources.len(), workers = config.workers, "starting run");
    let mut progress = match config.progress_interval {
        Some(interval) => Progress::new(std::io::stderr(), interval),
        None => Progress::disabled(),
    };
    let pool = if config.is_parallel() {
        Some(rayon::ThreadPoolBuilder::new().num_threads(config.workers).build()?)
    } else {
        None
    };

    let mut aggregator = Aggregator::new();
    let mut lines = 0;
    for source in &config.sources {
        match (&pool, source.path()) {
            (Some(pool), Some(path)) => {
                let (table, read) = pool.install(|| parallel::aggregate_file(path, config.workers))?;
                debug!(origin = %source.origin(), lines = read, "source consumed in parallel");
                aggregator.absorb(table);
                lines += read;
            }
            _ => lines += aggregator.consume(source, &mut progress)?,
        }
    }
    progress.finish();
    Ok((aggregator.finish(), lines))
}
