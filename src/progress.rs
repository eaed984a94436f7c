use std::io::Write;

pub const DEFAULT_INTERVAL: u64 = 1_000_000;

/// Line counter that prints `<n>\r` to a side stream every `interval` lines.
///
/// Write failures are ignored: progress output carries no information the
/// report depends on.
pub struct Progress<W: Write> {
    sink: Option<W>,
    interval: u64,
    seen: u64,
}

impl<W: Write> Progress<W> {
    pub fn new(sink: W, interval: u64) -> Self {
        Self { sink: Some(sink), interval: interval.max(1), seen: 0 }
    }

    pub fn disabled() -> Self {
        Self { sink: None, interval: u64::MAX, seen: 0 }
    }

    #[inline]
    pub fn tick(&mut self) {
        if let Some(sink) = &mut self.sink {
            if self.seen % self.interval == 0 {
                write!(sink, "{}\r", self.seen).ok();
                sink.flush().ok();
            }
        }
        self.seen += 1;
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn finish(&mut self) {
        if let Some(sink) = &mut self.sink {
            writeln!(sink).ok();
            sink.flush().ok();
        }
    }
}
