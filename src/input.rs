use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const READ_BUFFER_SIZE: usize = 1 << 16;

/// Where lines come from. `-` and an empty argument list both mean stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn from_args(paths: &[PathBuf]) -> Vec<Source> {
        if paths.is_empty() {
            return vec![Source::Stdin];
        }
        paths
            .iter()
            .map(|path| {
                if path.as_os_str() == "-" {
                    Source::Stdin
                } else {
                    Source::File(path.clone())
                }
            })
            .collect()
    }

    /// Name used in diagnostics.
    pub fn origin(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Stdin => None,
            Source::File(path) => Some(path),
        }
    }

    /// Buffered reader over the source's bytes.
    pub fn reader(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Source::Stdin => Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, std::io::stdin().lock()))),
            Source::File(path) => {
                let file = File::open(path).map_err(|e| Error::io(self.origin(), e))?;
                Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)))
            }
        }
    }

    /// Calls `f` with the 1-based line number and raw bytes of every line,
    /// reusing one buffer. Returns the number of lines read.
    pub fn for_each_line<F>(&self, f: F) -> Result<u64>
    where
        F: FnMut(u64, &[u8]) -> Result<()>,
    {
        read_lines(self.reader()?, &self.origin(), f)
    }
}

pub(crate) fn read_lines<R, F>(mut reader: R, origin: &str, mut f: F) -> Result<u64>
where
    R: BufRead,
    F: FnMut(u64, &[u8]) -> Result<()>,
{
    let mut buf = Vec::with_capacity(128);
    let mut line_no = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(origin, e))?;
        if read == 0 {
            return Ok(line_no);
        }
        line_no += 1;
        f(line_no, &buf)?;
    }
}
