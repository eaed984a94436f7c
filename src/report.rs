//! Final, sorted report.
//!
//! Numbers are rounded half away from zero at one decimal, i.e.
//! `(v * 10).round() / 10`, and negative zero prints as `0.0`. Magnitudes of
//! 2^52 and above have no fractional part and are printed as they are.

use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};
use crate::stats::{AggregationTable, StationStats};

/// Read-only view over a finished table, ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    entries: Vec<(String, StationStats)>,
}

impl Report {
    pub fn from_table(table: AggregationTable) -> Self {
        let mut entries: Vec<_> = table
            .into_entries()
            .filter(|(_, stats)| stats.count > 0)
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&StationStats> {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    /// Writes the report as a single line. Called once, after all input has
    /// been consumed.
    pub fn emit<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "{self}").map_err(Error::Output)?;
        out.flush().map_err(Error::Output)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, stats)) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", Entry(stats))?;
        }
        f.write_str("}")
    }
}

/// `min/mean/max` for one statistics record.
pub struct Entry<'a>(pub &'a StationStats);

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}/{:.1}/{:.1}",
            round_tenth(self.0.min),
            round_tenth(self.0.mean()),
            round_tenth(self.0.max)
        )
    }
}

/// Above 2^52 every `f64` is a whole number, and scaling by ten could
/// overflow to infinity.
const NO_FRACTION: f64 = 4_503_599_627_370_496.0;

#[inline]
pub fn round_tenth(value: f64) -> f64 {
    if value.abs() >= NO_FRACTION {
        return value;
    }
    // `+ 0.` turns -0.0 into 0.0
    (value * 10.).round() / 10. + 0.
}
