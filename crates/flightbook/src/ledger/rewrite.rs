//! Delete-by-rewrite for the ledger file.
//!
//! Records are streamed from the live file into a temporary file in the same
//! directory, dropping the first record the predicate selects. The temporary
//! file is flushed, fsynced and then renamed over the live file, so a reader
//! sees either the old ledger or the new one and never a missing file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::booking::Booking;
use crate::codec::{self, RecordBuilder};
use crate::error::{Error, Result};

use super::LossyLines;

/// Lines of a record that has been opened but not yet terminated.
#[derive(Debug, Default)]
struct OpenRecord {
    lines: Vec<String>,
    builder: RecordBuilder,
}

impl OpenRecord {
    fn push(&mut self, line: String) {
        self.builder.push_line(&line);
        self.lines.push(line);
    }
}

/// Writes surviving lines to the temporary file.
struct LineSink<W> {
    writer: W,
    path: PathBuf,
}

impl<W: Write> LineSink<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| Error::LedgerWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&mut self, lines: &[String]) -> Result<()> {
        lines.iter().try_for_each(|line| self.write_line(line))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::LedgerWrite {
            path: self.path.clone(),
            source,
        })
    }
}

pub(super) fn rewrite_excluding<P>(
    path: &Path,
    sync_writes: bool,
    mut predicate: P,
) -> Result<Option<Booking>>
where
    P: FnMut(&Booking) -> bool,
{
    let source = File::open(path).map_err(|source| Error::LedgerOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::LedgerOpen {
        path: dir.to_path_buf(),
        source,
    })?;
    let temp_path = temp.path().to_path_buf();
    debug!("Rewriting {} via {}", path.display(), temp_path.display());

    let removed = {
        let mut sink = LineSink {
            writer: BufWriter::new(temp.as_file_mut()),
            path: temp_path.clone(),
        };
        let removed = filter_records(BufReader::new(source), path, &mut sink, &mut predicate)?;
        sink.flush()?;
        removed
    };

    if sync_writes {
        temp.as_file().sync_all().map_err(|source| Error::LedgerWrite {
            path: temp_path,
            source,
        })?;
    }

    temp.persist(path).map_err(|err| Error::LedgerReplace {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    if sync_writes {
        sync_replaced_dir(dir);
    }

    Ok(removed)
}

/// Copy every line of `reader` to `sink` except those of the first record
/// selected by `predicate`, which is returned.
fn filter_records<R, W, P>(
    reader: R,
    source_path: &Path,
    sink: &mut LineSink<W>,
    predicate: &mut P,
) -> Result<Option<Booking>>
where
    R: BufRead,
    W: Write,
    P: FnMut(&Booking) -> bool,
{
    let mut removed: Option<Booking> = None;
    let mut open: Option<OpenRecord> = None;

    for line in LossyLines::new(reader) {
        let line = line.map_err(|source| Error::LedgerRead {
            path: source_path.to_path_buf(),
            source,
        })?;

        if codec::is_separator(&line) {
            if let Some(mut record) = open.take() {
                record.lines.push(line);
                let selected = if removed.is_none() {
                    record.builder.build().filter(|booking| predicate(booking))
                } else {
                    None
                };
                match selected {
                    Some(booking) => removed = Some(booking),
                    None => sink.write_all(&record.lines)?,
                }
            } else {
                sink.write_line(&line)?;
            }
            continue;
        }

        if codec::starts_record(&line) {
            if let Some(abandoned) = open.take() {
                sink.write_all(&abandoned.lines)?;
            }
            open = Some(OpenRecord::default());
        }

        match open.as_mut() {
            Some(record) => record.push(line),
            None => sink.write_line(&line)?,
        }
    }

    if let Some(unterminated) = open {
        sink.write_all(&unterminated.lines)?;
    }

    Ok(removed)
}

/// Fsync the directory after the rename. The ledger is already replaced at
/// this point, so a failure is logged and not returned.
fn sync_replaced_dir(dir: &Path) {
    if let Err(err) = sync_dir(dir) {
        warn!(error = %err, "Ledger replaced but directory sync failed");
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(|source| Error::LedgerReplace {
            path: dir.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingRequest;
    use crate::codec::{encode, SEPARATOR};

    fn booking(id: &str, name: &str) -> Booking {
        BookingRequest::new(name, "Goa", "Pune", "Vistara", "2025-10-19", "18:00")
            .into_booking(id.to_string(), 1897)
    }

    fn run_filter(input: &str, mut predicate: impl FnMut(&Booking) -> bool) -> (String, Option<Booking>) {
        let mut sink = LineSink {
            writer: Vec::new(),
            path: PathBuf::from("temp"),
        };
        let removed = filter_records(
            input.as_bytes(),
            Path::new("bookings.txt"),
            &mut sink,
            &mut predicate,
        )
        .unwrap();
        (String::from_utf8(sink.writer).unwrap(), removed)
    }

    #[test]
    fn test_filter_drops_selected_record() {
        let input = format!("{}{}", encode(&booking("BKG1", "Asha")), encode(&booking("BKG2", "Ravi")));
        let (output, removed) = run_filter(&input, |b| b.id == "BKG1");

        assert_eq!(removed.unwrap().passenger_name, "Asha");
        assert_eq!(output, encode(&booking("BKG2", "Ravi")));
    }

    #[test]
    fn test_filter_stops_after_first_match() {
        let input = format!("{}{}", encode(&booking("BKG1", "Asha")), encode(&booking("BKG2", "Asha")));
        let (output, removed) = run_filter(&input, |_| true);

        assert_eq!(removed.unwrap().id, "BKG1");
        assert_eq!(output, encode(&booking("BKG2", "Asha")));
    }

    #[test]
    fn test_filter_copies_stray_and_unterminated_lines() {
        let input = format!(
            "header note\n{SEPARATOR}\n{}Booking ID: BKG9\nName: Half\n",
            encode(&booking("BKG1", "Asha"))
        );
        let (output, removed) = run_filter(&input, |b| b.id == "BKG9");

        assert!(removed.is_none());
        assert_eq!(output, input);
    }

    #[test]
    fn test_filter_never_selects_records_missing_a_name() {
        let input = format!("Booking ID: BKG1\nFrom: Goa\n{SEPARATOR}\n");
        let (output, removed) = run_filter(&input, |_| true);

        assert!(removed.is_none());
        assert_eq!(output, input);
    }

    #[test]
    fn test_filter_keeps_abandoned_record_lines() {
        let input = format!("Booking ID: BKG1\nName: Lost\n{}", encode(&booking("BKG2", "Ravi")));
        let (output, removed) = run_filter(&input, |b| b.id == "BKG2");

        assert_eq!(removed.unwrap().id, "BKG2");
        assert_eq!(output, "Booking ID: BKG1\nName: Lost\n");
    }

    #[test]
    fn test_filter_reads_past_invalid_utf8() {
        let mut input = encode(&booking("BKG1", "Asha")).into_bytes();
        input.extend_from_slice(b"Name: \xff\n");
        let mut sink = LineSink {
            writer: Vec::new(),
            path: PathBuf::from("temp"),
        };

        let removed = filter_records(
            input.as_slice(),
            Path::new("bookings.txt"),
            &mut sink,
            &mut |b: &Booking| b.id == "BKG1",
        )
        .unwrap();

        assert_eq!(removed.unwrap().id, "BKG1");
        assert_eq!(String::from_utf8(sink.writer).unwrap(), "Name: \u{fffd}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_sync_failure_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        assert!(sync_dir(&missing).is_err());
        sync_replaced_dir(&missing);
    }

    #[test]
    fn test_rewrite_replaces_file_in_place() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bookings.txt");
        std::fs::write(&path, encode(&booking("BKG1", "Asha"))).unwrap();

        let removed = rewrite_excluding(&path, true, |_| true).unwrap();

        assert_eq!(removed.unwrap().id, "BKG1");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
