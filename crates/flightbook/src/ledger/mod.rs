//! Flat-file ledger storage for flightbook.
//!
//! The ledger is a single text file of records in the [`crate::codec`]
//! format, in creation order. There is no index: every read is a linear scan
//! from the start of the file, and deletion rewrites the whole file.
//!
//! The store assumes one process at a time. It takes no locks; concurrent
//! writers from outside the process are not detected.

mod rewrite;

use std::fs::{File, OpenOptions};
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::booking::Booking;
use crate::codec::{self, Records};
use crate::error::{Error, Result};

/// Storage engine for bookings.
///
/// Provides:
/// - Appending encoded records
/// - Lazy line and record scans
/// - Line-level substring search
/// - Deletion by filtered rewrite with atomic replacement
#[derive(Debug)]
pub struct Ledger {
    /// Path to the ledger file.
    path: PathBuf,
    /// Whether to fsync after every append and before every replace.
    sync_writes: bool,
}

impl Ledger {
    /// Open or create a ledger at the given path.
    ///
    /// Creates the parent directories and an empty ledger file if they don't
    /// exist. Existing content is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening ledger at {}", path.display());
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::LedgerOpen {
                path: path.clone(),
                source,
            })?;

        info!("Ledger ready at {}", path.display());
        Ok(Self {
            path,
            sync_writes: true,
        })
    }

    /// Set whether writes are fsynced before an operation returns.
    #[must_use]
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Get the path to the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an encoded record block.
    ///
    /// The block is written with a single `write_all` on a handle opened in
    /// append mode, then flushed (and fsynced if enabled) before the handle
    /// is closed. If the file does not end in a newline, one is written first
    /// so the block starts on its own line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, block: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.open_error(source))?;

        let write_err = |source| Error::LedgerWrite {
            path: self.path.clone(),
            source,
        };

        let mut buf = String::with_capacity(block.len() + 1);
        if missing_trailing_newline(&mut file).map_err(write_err)? {
            buf.push('\n');
        }
        buf.push_str(block);

        file.write_all(buf.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        if self.sync_writes {
            file.sync_all().map_err(write_err)?;
        }

        debug!(bytes = buf.len(), "Appended record block");
        Ok(())
    }

    /// Append one booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append_booking(&self, booking: &Booking) -> Result<()> {
        self.append(&codec::encode(booking))
    }

    /// Lazily read every line of the ledger, in file order.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`, so a
    /// corrupted line never blocks the lines around it. The file handle is closed when the iterator is dropped, whether or not
    /// it was read to the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be opened.
    pub fn scan_all(&self) -> Result<LedgerLines> {
        let file = File::open(&self.path).map_err(|source| self.open_error(source))?;
        Ok(LedgerLines {
            path: self.path.clone(),
            lines: LossyLines::new(BufReader::new(file)),
        })
    }

    /// Lazily decode every complete record, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be opened.
    pub fn records(&self) -> Result<Records<LedgerLines>> {
        Ok(Records::new(self.scan_all()?))
    }

    /// Read every line of the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn read_all(&self) -> Result<Vec<String>> {
        self.scan_all()?.collect()
    }

    /// Decode every complete record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn bookings(&self) -> Result<Vec<Booking>> {
        self.records()?.collect()
    }

    /// Every line containing `key` as a substring, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn search_lines(&self, key: &str) -> Result<Vec<String>> {
        let mut matches = Vec::new();
        for line in self.scan_all()? {
            let line = line?;
            if line.contains(key) {
                matches.push(line);
            }
        }
        debug!(key, matches = matches.len(), "Searched ledger");
        Ok(matches)
    }

    /// Remove the first record whose predicate is true.
    ///
    /// All other lines are copied verbatim into a temporary file in the same
    /// directory, which then atomically replaces the ledger. At most one
    /// record is removed per call. If nothing matches, the ledger is still
    /// replaced by an equivalent copy.
    ///
    /// The live file is never written during the rewrite; on any error it is
    /// left as it was and the temporary file is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or written, or the
    /// replacement rename fails.
    pub fn rewrite_excluding<P>(&self, predicate: P) -> Result<Option<Booking>>
    where
        P: FnMut(&Booking) -> bool,
    {
        let removed = rewrite::rewrite_excluding(&self.path, self.sync_writes, predicate)?;
        if let Some(booking) = &removed {
            info!(id = %booking.id, "Removed booking from ledger");
        }
        Ok(removed)
    }

    /// Remove the first record whose id contains `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewrite fails.
    pub fn delete_by_id(&self, key: &str) -> Result<Option<Booking>> {
        self.rewrite_excluding(|booking| booking.id.contains(key))
    }

    /// Get ledger statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn stats(&self) -> Result<LedgerStats> {
        let metadata = std::fs::metadata(&self.path).map_err(|source| self.open_error(source))?;
        let total_lines = self.scan_all()?.try_fold(0usize, |n, line| line.map(|_| n + 1))?;
        let total_records = self.records()?.try_fold(0usize, |n, rec| rec.map(|_| n + 1))?;

        Ok(LedgerStats {
            total_records,
            total_lines,
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn open_error(&self, source: std::io::Error) -> Error {
        Error::LedgerOpen {
            path: self.path.clone(),
            source,
        }
    }
}

/// Check whether a non-empty file lacks a final `\n`.
fn missing_trailing_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Line reader that decodes each line leniently.
///
/// Lines end at `\n`, with an optional preceding `\r` stripped, as with
/// [`BufRead::lines`]. Invalid UTF-8 is replaced rather than reported.
#[derive(Debug)]
pub(crate) struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(match String::from_utf8_lossy(&self.buf) {
                    Cow::Borrowed(line) => line.to_string(),
                    Cow::Owned(line) => {
                        warn!("Replaced invalid UTF-8 in ledger line");
                        line
                    }
                }))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Lazy line iterator over the ledger file.
#[derive(Debug)]
pub struct LedgerLines {
    path: PathBuf,
    lines: LossyLines<BufReader<File>>,
}

impl Iterator for LedgerLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| {
            line.map_err(|source| Error::LedgerRead {
                path: self.path.clone(),
                source,
            })
        })
    }
}

/// Statistics about the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    /// Number of complete, decodable records.
    pub total_records: usize,
    /// Number of lines in the file.
    pub total_lines: usize,
    /// Size of the ledger file in bytes.
    pub size_bytes: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}
