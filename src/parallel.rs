//! Multi-worker aggregation over a memory-mapped file.
//!
//! The file is cut into one chunk per worker on newline boundaries, every
//! chunk is folded into its own table on the rayon pool and the tables are
//! merged in chunk order.

use std::fs::File;
use std::io::{BufReader, Sink};
use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::aggregate::Aggregator;
use crate::error::{Error, RecordError, Result};
use crate::progress::Progress;
use crate::record::parse_record_bytes;
use crate::stats::AggregationTable;

const STREAM_BUFFER_SIZE: usize = 1 << 16;

/// Per-chunk outcome: the table and number of lines, or the byte offset and
/// reason of the first bad line.
type ChunkResult = std::result::Result<(AggregationTable, u64), (usize, RecordError)>;

/// Non-regular files (pipes, FIFOs, devices) are streamed on the calling
/// thread instead of being mapped.
pub fn aggregate_file(path: &Path, workers: usize) -> Result<(AggregationTable, u64)> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::io(&origin, e))?;
    let metadata = file.metadata().map_err(|e| Error::io(&origin, e))?;
    if !metadata.is_file() {
        // pipes and devices report no length and cannot be mapped
        debug!(origin = %origin, "not a regular file, reading sequentially");
        let mut aggregator = Aggregator::new();
        let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
        let lines = aggregator.consume_reader(reader, &origin, &mut Progress::<Sink>::disabled())?;
        return Ok((aggregator.into_table(), lines));
    }
    if metadata.len() == 0 {
        return Ok((AggregationTable::new(), 0));
    }
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| Error::io(&origin, e))?;
    aggregate_bytes(&mmap, workers, &origin)
}

pub fn aggregate_bytes(data: &[u8], workers: usize, origin: &str) -> Result<(AggregationTable, u64)> {
    let chunks = chunk_bounds(data, workers.max(1));
    debug!(origin, chunks = chunks.len(), "aggregating chunks");

    let results: Vec<ChunkResult> = chunks
        .par_iter()
        .map(|&(start, end)| aggregate_chunk(data, start, end))
        .collect();

    let mut table = AggregationTable::new();
    let mut lines = 0;
    for result in results {
        match result {
            Ok((chunk, chunk_lines)) => {
                table.merge(chunk);
                lines += chunk_lines;
            }
            Err((offset, reason)) => {
                let line_no = line_number_at(data, offset);
                let content = String::from_utf8_lossy(line_at(data, offset));
                return Err(Error::malformed(origin, line_no, content.trim_end(), reason));
            }
        }
    }
    Ok((table, lines))
}

fn aggregate_chunk(data: &[u8], start: usize, end: usize) -> ChunkResult {
    let segment = &data[start..end];
    let mut table = AggregationTable::new();
    let mut offset = 0;
    let mut lines = 0;
    while let Some((line, next)) = next_line(segment, offset) {
        let record = parse_record_bytes(line).map_err(|reason| (start + offset, reason))?;
        table.observe(record.key, record.value);
        lines += 1;
        offset = next;
    }
    Ok((table, lines))
}

/// Splits `data` into at most `parts` ranges; every range except the first
/// starts right after a newline.
fn chunk_bounds(data: &[u8], parts: usize) -> Vec<(usize, usize)> {
    let chunk_size = data.len() / parts;
    let mut starts: Vec<usize> = (0..parts)
        .map(|pos| if pos == 0 { 0 } else { optimize_position(data, pos * chunk_size) })
        .collect();
    starts.push(data.len());
    starts.dedup();
    starts
        .windows(2)
        .map(|w| (w[0], w[1]))
        .filter(|(start, end)| start < end)
        .collect()
}

#[inline]
fn optimize_position(data: &[u8], position: usize) -> usize {
    data[position..]
        .iter()
        .position(|&x| x == b'\n')
        .map(|x| position + x + 1)
        .unwrap_or(data.len())
}

#[inline]
fn next_line(segment: &[u8], start: usize) -> Option<(&[u8], usize)> {
    if start >= segment.len() {
        return None;
    }
    let end = find_pattern(segment, start, b'\n');
    Some((&segment[start..end], end + 1))
}

#[inline]
fn find_pattern(segment: &[u8], start: usize, pattern: u8) -> usize {
    segment[start..]
        .iter()
        .position(|&b| b == pattern)
        .map_or(segment.len(), |pos| start + pos)
}

fn line_number_at(data: &[u8], offset: usize) -> u64 {
    data[..offset].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

fn line_at(data: &[u8], offset: usize) -> &[u8] {
    let end = find_pattern(data, offset, b'\n');
    &data[offset..end]
}
