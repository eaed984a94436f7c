use std::path::PathBuf;

use clap::Parser;

use crate::input::Source;
use crate::progress::DEFAULT_INTERVAL;

#[derive(Parser, Debug)]
#[command(name = "station-stats")]
#[command(about = "Per-key min/mean/max over `key;value` lines", long_about = None)]
pub struct Cli {
    /// Input files, read in order. `-` or no files reads stdin
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Worker threads for file input (0 = one per core, 1 = sequential)
    #[arg(short = 'j', long, env = "STATION_STATS_WORKERS", default_value_t = 1)]
    pub workers: usize,

    /// Print a line counter to stderr every N lines
    #[arg(
        long,
        env = "STATION_STATS_PROGRESS_INTERVAL",
        default_value_t = DEFAULT_INTERVAL,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub progress_interval: u64,

    /// Do not print progress
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// Everything a run needs, independent of how it was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub sources: Vec<Source>,
    pub workers: usize,
    pub progress_interval: Option<u64>,
}

impl RunConfig {
    pub fn sequential(sources: Vec<Source>) -> Self {
        Self { sources, workers: 1, progress_interval: None }
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        let workers = match cli.workers {
            0 => std::thread::available_parallelism().map_or(1, usize::from),
            n => n,
        };
        Self {
            sources: Source::from_args(&cli.files),
            workers,
            progress_interval: (!cli.quiet).then_some(cli.progress_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_stdin_sequentially() {
        let cli = Cli::try_parse_from(["station-stats"]).unwrap();
        let config = RunConfig::from(cli);
        assert_eq!(config.sources, vec![Source::Stdin]);
        assert_eq!(config.workers, 1);
        assert_eq!(config.progress_interval, Some(DEFAULT_INTERVAL));
        assert!(!config.is_parallel());
    }

    #[test]
    fn parses_files_workers_and_quiet() {
        let cli = Cli::try_parse_from(["station-stats", "-j", "4", "-q", "a.txt", "b.txt"]).unwrap();
        let config = RunConfig::from(cli);
        assert_eq!(
            config.sources,
            vec![Source::File("a.txt".into()), Source::File("b.txt".into())]
        );
        assert_eq!(config.workers, 4);
        assert_eq!(config.progress_interval, None);
        assert!(config.is_parallel());
    }

    #[test]
    fn zero_workers_uses_all_cores() {
        let cli = Cli::try_parse_from(["station-stats", "--workers", "0"]).unwrap();
        assert!(RunConfig::from(cli).workers >= 1);
    }

    #[test]
    fn rejects_zero_progress_interval() {
        assert!(Cli::try_parse_from(["station-stats", "--progress-interval", "0"]).is_err());
    }
}
