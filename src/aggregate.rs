//! Accumulating phase of a run.
//!
//! An [`Aggregator`] accepts observations until [`Aggregator::finish`]
//! consumes it and hands back the read-only [`Report`].

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{Error, Result};
use crate::input::{read_lines, Source};
use crate::progress::Progress;
use crate::record::parse_record_bytes;
use crate::report::Report;
use crate::stats::AggregationTable;

#[derive(Debug, Default)]
pub struct Aggregator {
    table: AggregationTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn observe(&mut self, key: &str, value: f64) {
        self.table.observe(key, value);
    }

    /// Folds a table built elsewhere (e.g. by a worker) into this one.
    pub fn absorb(&mut self, table: AggregationTable) {
        self.table.merge(table);
    }

    pub fn table(&self) -> &AggregationTable {
        &self.table
    }

    /// Parses and observes every line of `source`. The first malformed line
    /// aborts with its origin and line number; nothing from it is observed.
    pub fn consume<W: Write>(&mut self, source: &Source, progress: &mut Progress<W>) -> Result<u64> {
        let origin = source.origin();
        let lines = self.consume_reader(source.reader()?, &origin, progress)?;
        debug!(origin = %origin, lines, "source consumed");
        Ok(lines)
    }

    /// Same as [`Aggregator::consume`] over any buffered reader.
    pub fn consume_reader<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        origin: &str,
        progress: &mut Progress<W>,
    ) -> Result<u64> {
        read_lines(reader, origin, |line_no, line| {
            let record = parse_record_bytes(line).map_err(|reason| {
                Error::malformed(origin, line_no, String::from_utf8_lossy(line).trim_end(), reason)
            })?;
            self.table.observe(record.key, record.value);
            progress.tick();
            Ok(())
        })
    }

    pub(crate) fn into_table(self) -> AggregationTable {
        self.table
    }

    pub fn finish(self) -> Report {
        Report::from_table(self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;

    fn consume_bytes(aggregator: &mut Aggregator, input: &[u8]) -> Result<u64> {
        aggregator.consume_reader(input, "mem", &mut Progress::<Vec<u8>>::disabled())
    }

    #[test]
    fn scenario_from_three_lines() {
        let mut aggregator = Aggregator::new();
        consume_bytes(&mut aggregator, b"Hamburg;12.0\nBulawayo;8.9\nHamburg;18.0\n").unwrap();
        assert_eq!(
            aggregator.finish().to_string(),
            "{Bulawayo=8.9/8.9/8.9, Hamburg=12.0/15.0/18.0}"
        );
    }

    #[test]
    fn stops_at_first_bad_line() {
        let mut aggregator = Aggregator::new();
        let err = consume_bytes(&mut aggregator, b"Oslo;1.0\nBadLine\nOslo;2.0\n").unwrap_err();
        match err {
            Error::MalformedRecord { origin, line, content, reason } => {
                assert_eq!(origin, "mem");
                assert_eq!(line, 2);
                assert_eq!(content, "BadLine");
                assert_eq!(reason, RecordError::MissingSeparator);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(aggregator.table().get("Oslo").unwrap().count, 1);
    }

    #[test]
    fn absorb_merges_worker_tables() {
        let mut aggregator = Aggregator::new();
        aggregator.observe("Oslo", 1.0);
        let mut worker = AggregationTable::new();
        worker.observe("Oslo", 3.0);
        worker.observe("Rome", 20.0);
        aggregator.absorb(worker);
        let oslo = aggregator.table().get("Oslo").unwrap();
        assert_eq!((oslo.count, oslo.min, oslo.max), (2, 1.0, 3.0));
        assert_eq!(aggregator.table().len(), 2);
    }

    #[test]
    fn consume_reader_ticks_progress_per_line() {
        let mut aggregator = Aggregator::new();
        let mut out = Vec::new();
        let mut progress = Progress::new(&mut out, 2);
        let lines = aggregator
            .consume_reader(&b"a;1\nb;2\na;3\n"[..], "mem", &mut progress)
            .unwrap();
        assert_eq!(lines, 3);
        assert_eq!(progress.seen(), 3);
        assert_eq!(aggregator.into_table().get("a").unwrap().count, 2);
    }
}
