//! Error types for a single aggregation run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single line could not be turned into a record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing ';' separator")]
    MissingSeparator,
    #[error("empty key")]
    EmptyKey,
    #[error("value is not a number")]
    InvalidValue,
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Any failure aborts the run; no partial report is ever written.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed record at {origin}:{line} ({reason}): {content:?}")]
    MalformedRecord {
        origin: String,
        line: u64,
        content: String,
        reason: RecordError,
    },

    #[error("cannot read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot write report: {0}")]
    Output(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn io(origin: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io { origin: origin.into(), source }
    }

    pub(crate) fn malformed(origin: impl Into<String>, line: u64, content: impl Into<String>, reason: RecordError) -> Self {
        Error::MalformedRecord {
            origin: origin.into(),
            line,
            content: content.into(),
            reason,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}
