//! Thread-safe buffered output writer: a bounded `crossbeam-channel` queue
//! drained by one background thread, so concurrent `submit`s never
//! interleave inside a single record's bytes.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use logfilter_core::errors::file_error::{FileError, FileErrorKind};

const CHANNEL_BOUND: usize = 1024;

enum Command {
    /// One file's records are always submitted by its single owning
    /// worker in increasing `line_start` order, so reordering is only
    /// ever needed across files.
    Write(u64, Vec<u8>),
    FileDone(u64),
    Flush,
    FlushSync(std::sync::mpsc::SyncSender<()>),
    Shutdown,
}

enum Sink {
    File(BufWriter<File>),
    Stdout(Stdout),
    /// Discards every byte, counting them. Used for dry runs, where the
    /// pipeline still needs to know how much output it would have produced.
    Null(u64),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::File(w) => w.write(buf),
            Sink::Stdout(w) => w.write(buf),
            Sink::Null(count) => {
                *count += buf.len() as u64;
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File(w) => w.flush(),
            Sink::Stdout(w) => w.flush(),
            Sink::Null(_) => Ok(()),
        }
    }
}

/// Thread-safe handle to the background writer. Cloning is cheap (the
/// sender is shared); every worker holds one.
#[derive(Clone)]
pub struct OutputWriter {
    tx: Sender<Command>,
}

pub struct WriterHandle {
    writer: OutputWriter,
    join: Option<JoinHandle<Result<(), FileError>>>,
}

impl WriterHandle {
    /// Open `path` (truncating iff `overwrite`), or use stdout when `path`
    /// is `None`, and spawn the dedicated writer thread. `deterministic_order`
    /// makes the writer buffer each file's bytes until that file's worker
    /// signals completion, then release files strictly in ascending
    /// `file_seq` order.
    pub fn open(path: Option<&Path>, overwrite: bool, deterministic_order: bool) -> Result<Self, FileError> {
        let sink = match path {
            Some(p) => {
                let file = open_destination(p, overwrite)?;
                Sink::File(BufWriter::new(file))
            }
            None => Sink::Stdout(io::stdout()),
        };
        let path_for_errors = path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("<stdout>"));
        Self::spawn(sink, path_for_errors, deterministic_order)
    }

    /// Open a counting sink that discards every byte written to it. Used
    /// for dry runs, where the pipeline must still exercise the full
    /// per-record rendering path but never touch the real destination.
    pub fn open_null(deterministic_order: bool) -> Result<Self, FileError> {
        Self::spawn(Sink::Null(0), PathBuf::from("<null>"), deterministic_order)
    }

    fn spawn(sink: Sink, path_for_errors: PathBuf, deterministic_order: bool) -> Result<Self, FileError> {
        let (tx, rx) = bounded(CHANNEL_BOUND);

        let join = thread::Builder::new()
            .name("logfilter-writer".to_string())
            .spawn(move || writer_loop(sink, rx, path_for_errors, deterministic_order))
            .expect("failed to spawn writer thread");

        Ok(Self {
            writer: OutputWriter { tx },
            join: Some(join),
        })
    }

    pub fn writer(&self) -> OutputWriter {
        self.writer.clone()
    }

    /// Shut down the writer thread and propagate its terminal I/O error, if any.
    pub fn shutdown(mut self) -> Result<(), FileError> {
        let _ = self.writer.tx.send(Command::Shutdown);
        if let Some(handle) = self.join.take() {
            handle.join().unwrap_or(Ok(()))
        } else {
            Ok(())
        }
    }
}

impl OutputWriter {
    /// Submit a pre-formatted record's bytes for `file_seq`. Atomic per
    /// call: the whole buffer lands contiguously in the output, or (on a
    /// disconnected writer) not at all.
    pub fn submit(&self, file_seq: u64, bytes: Vec<u8>) -> Result<(), FileError> {
        self.tx
            .send(Command::Write(file_seq, bytes))
            .map_err(|_| FileError::new(FileErrorKind::IoError, "<writer>"))
    }

    /// Signal that `file_seq`'s worker has finished; in deterministic mode
    /// this may release `file_seq` and any subsequently-completed files
    /// that were waiting behind it.
    pub fn file_done(&self, file_seq: u64) {
        let _ = self.tx.send(Command::FileDone(file_seq));
    }

    pub fn flush(&self) {
        let _ = self.tx.send(Command::Flush);
    }

    pub fn flush_sync(&self) {
        let (tx, rx) = std::sync::mpsc::sync_channel(0);
        if self.tx.send(Command::FlushSync(tx)).is_ok() {
            let _ = rx.recv();
        }
    }
}

fn open_destination(path: &Path, overwrite: bool) -> Result<File, FileError> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true);
    if overwrite {
        opts.truncate(true);
    } else {
        opts.create_new(true);
    }
    opts.open(path).map_err(|e| FileError::from_io(path, &e))
}

/// Tracks, for deterministic mode, each file's accumulated bytes and
/// whether its worker has signaled completion.
#[derive(Default)]
struct FileBuffer {
    bytes: Vec<u8>,
    done: bool,
}

fn writer_loop(
    mut sink: Sink,
    rx: Receiver<Command>,
    path: PathBuf,
    deterministic_order: bool,
) -> Result<(), FileError> {
    let mut buffers: HashMap<u64, FileBuffer> = HashMap::new();
    let mut next_release: u64 = 0;
    let mut write_err: Option<FileError> = None;

    for cmd in rx.iter() {
        match cmd {
            Command::Write(file_seq, bytes) => {
                if write_err.is_some() {
                    continue;
                }
                if deterministic_order {
                    buffers.entry(file_seq).or_default().bytes.extend_from_slice(&bytes);
                } else if let Err(e) = sink.write_all(&bytes) {
                    write_err = Some(FileError::from_io(&path, &e));
                }
            }
            Command::FileDone(file_seq) => {
                if deterministic_order {
                    buffers.entry(file_seq).or_default().done = true;
                    release_ready(&mut sink, &mut buffers, &mut next_release, &path, &mut write_err);
                }
            }
            Command::Flush | Command::FlushSync(_) => {
                let _ = sink.flush();
                if let Command::FlushSync(done_tx) = cmd {
                    let _ = done_tx.send(());
                }
            }
            Command::Shutdown => break,
        }
    }

    let _ = sink.flush();
    if let Some(e) = write_err {
        return Err(e);
    }
    Ok(())
}

/// Write every contiguously-completed file starting at `next_release`.
fn release_ready(
    sink: &mut Sink,
    buffers: &mut HashMap<u64, FileBuffer>,
    next_release: &mut u64,
    path: &Path,
    write_err: &mut Option<FileError>,
) {
    while let Some(buf) = buffers.get(next_release) {
        if !buf.done || write_err.is_some() {
            break;
        }
        let buf = buffers.remove(next_release).unwrap();
        if let Err(e) = sink.write_all(&buf.bytes) {
            *write_err = Some(FileError::from_io(path, &e));
        }
        *next_release += 1;
    }
}
