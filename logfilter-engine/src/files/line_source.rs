//! Uniform line iteration over plain and gzip log files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use logfilter_core::errors::file_error::{FileError, FileErrorKind};

/// A lazy source of `(line_number, line_bytes)` pairs. `line_bytes` never
/// includes the line terminator; a single trailing `\r` is stripped so
/// CRLF and LF inputs behave identically.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<(u64, Vec<u8>)>, FileError>;
}

/// Splits an arbitrary `Read` on `\n`, stripping a trailing `\r`.
struct LineSplitter<R> {
    reader: BufReader<R>,
    path: PathBuf,
    line_no: u64,
}

impl<R: Read> LineSplitter<R> {
    fn new(reader: R, path: PathBuf) -> Self {
        Self {
            reader: BufReader::new(reader),
            path,
            line_no: 0,
        }
    }

    fn read_one(&mut self) -> Result<Option<(u64, Vec<u8>)>, FileError> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| FileError::from_io(&self.path, &e))?;

        if read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        self.line_no += 1;
        Ok(Some((self.line_no, buf)))
    }
}

pub struct PlainLines(LineSplitter<File>);

impl PlainLines {
    fn open(path: &Path) -> Result<Self, FileError> {
        let file = File::open(path).map_err(|e| FileError::from_io(path, &e))?;
        Ok(Self(LineSplitter::new(file, path.to_path_buf())))
    }
}

impl LineSource for PlainLines {
    fn next_line(&mut self) -> Result<Option<(u64, Vec<u8>)>, FileError> {
        self.0.read_one()
    }
}

pub struct GzipLines(LineSplitter<GzDecoder<File>>);

impl GzipLines {
    fn open(path: &Path) -> Result<Self, FileError> {
        let file = File::open(path).map_err(|e| FileError::from_io(path, &e))?;
        Ok(Self(LineSplitter::new(GzDecoder::new(file), path.to_path_buf())))
    }
}

impl LineSource for GzipLines {
    fn next_line(&mut self) -> Result<Option<(u64, Vec<u8>)>, FileError> {
        self.0.read_one().map_err(|e| {
            if e.kind == FileErrorKind::IoError {
                FileError::with_cause(FileErrorKind::DecompressionFailed, &self.0.path, e.to_string())
            } else {
                e
            }
        })
    }
}

/// Dispatch by extension: `.gz` gets the streaming decompressor, anything
/// else is read as plain text bytes.
pub fn open_line_source(path: &Path) -> Result<Box<dyn LineSource + Send>, FileError> {
    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        Ok(Box::new(GzipLines::open(path)?))
    } else {
        Ok(Box::new(PlainLines::open(path)?))
    }
}
