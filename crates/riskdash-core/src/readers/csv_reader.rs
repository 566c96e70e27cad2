//! CSV Parser Adapter
//!
//! Turns a CSV byte source into ordered [`RowRecord`]s using the first
//! non-blank line as header. Any row-level problem fails the whole parse:
//! callers get either every record or one message listing every bad row.
//!
//! ```no_run
//! use riskdash_core::readers::{parse_async, FileSource, ParserConfig};
//!
//! let handle = parse_async(FileSource::from_path("activity.csv"), ParserConfig::default());
//! let rows = handle.wait()?;
//! # Ok::<(), riskdash_core::DashboardError>(())
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::errors::{DashboardError, Result};
use crate::readers::config::ParserConfig;
use crate::types::RowRecord;

const BOM: &str = "\u{feff}";

/// Separator between row error messages in a [`DashboardError::Parse`]
pub const ERROR_SEPARATOR: &str = "; ";

/// File format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_path(path: &str) -> Option<Self> {
        if path.to_lowercase().ends_with(".csv") {
            Some(FileFormat::Csv)
        } else {
            None
        }
    }
}

/// A file handed to the upload path, either on disk or already in memory.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl FileSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        FileSource::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        FileSource::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            FileSource::Path(path) => path.display().to_string(),
            FileSource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Reject anything that is not a `.csv` file
    pub fn check_format(&self) -> Result<FileFormat> {
        let name = self.name();
        FileFormat::from_path(&name).ok_or(DashboardError::UnsupportedFile { path: name })
    }
}

/// Parse a CSV stream into records.
pub fn parse_reader<R: Read>(reader: R, config: &ParserConfig) -> Result<Vec<RowRecord>> {
    parse_with_cancel(reader, config, None)
}

pub fn parse_bytes(data: &[u8], config: &ParserConfig) -> Result<Vec<RowRecord>> {
    parse_reader(data, config)
}

pub fn parse_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Vec<RowRecord>> {
    let file = File::open(path.as_ref())?;
    parse_reader(file, config)
}

fn parse_source(
    source: &FileSource,
    config: &ParserConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<RowRecord>> {
    match source {
        FileSource::Path(path) => parse_with_cancel(File::open(path)?, config, cancel),
        FileSource::Bytes { data, .. } => parse_with_cancel(data.as_slice(), config, cancel),
    }
}

fn is_blank(record: &ByteRecord) -> bool {
    record
        .iter()
        .all(|field| field.iter().all(|b| b.is_ascii_whitespace()))
}

fn parse_with_cancel<R: Read>(
    reader: R,
    config: &ParserConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<RowRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter)
        .from_reader(reader);

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut record = ByteRecord::new();

    loop {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(DashboardError::Cancelled);
        }

        match csv_reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(DashboardError::Io(io::Error::from(e))),
            Err(e) => {
                errors.push(e.to_string());
                continue;
            }
        }

        if is_blank(&record) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if header.is_none() {
            header = Some(read_header(&record, line)?);
            continue;
        }
        let columns = header.as_deref().unwrap_or_default();

        if record.len() != columns.len() {
            let kind = if record.len() < columns.len() {
                "Too few fields"
            } else {
                "Too many fields"
            };
            errors.push(format!(
                "Line {}: {}: expected {} fields but parsed {}",
                line,
                kind,
                columns.len(),
                record.len()
            ));
            continue;
        }

        let mut row = RowRecord::with_capacity(columns.len());
        let mut valid = true;
        for (column, raw) in columns.iter().zip(record.iter()) {
            match std::str::from_utf8(raw) {
                Ok(value) => {
                    let value = if config.trim_values { value.trim() } else { value };
                    row.insert(column.as_str(), value);
                }
                Err(_) => {
                    errors.push(format!(
                        "Line {}: invalid UTF-8 in column '{}'",
                        line, column
                    ));
                    valid = false;
                    break;
                }
            }
        }

        if valid {
            rows.push(row);
            if config.row_limit_reached(rows.len()) {
                break;
            }
        }
    }

    if !errors.is_empty() {
        debug!(errors = errors.len(), "csv parse reported row errors");
        return Err(DashboardError::Parse(errors.join(ERROR_SEPARATOR)));
    }

    debug!(rows = rows.len(), "csv parse complete");
    Ok(rows)
}

/// Column names must be non-empty and unique, otherwise records would lose cells.
fn read_header(record: &ByteRecord, line: u64) -> Result<Vec<String>> {
    let mut columns: Vec<String> = Vec::with_capacity(record.len());
    let mut errors = Vec::new();
    for (i, raw) in record.iter().enumerate() {
        let name = std::str::from_utf8(raw).map_err(|_| {
            DashboardError::Parse(format!("Line {}: invalid UTF-8 in header", line))
        })?;
        let name = if i == 0 {
            name.trim_start_matches(BOM)
        } else {
            name
        };
        let name = name.trim();
        if name.is_empty() {
            errors.push(format!(
                "Line {}: empty column name at position {}",
                line,
                i + 1
            ));
        } else if columns.iter().any(|c| c == name) {
            errors.push(format!("Line {}: duplicate column name '{}'", line, name));
        }
        columns.push(name.to_string());
    }

    if !errors.is_empty() {
        return Err(DashboardError::Parse(errors.join(ERROR_SEPARATOR)));
    }
    Ok(columns)
}

/// Shared flag a running parse checks between records.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parse `source` on a worker thread and hand the outcome to `on_complete`.
///
/// `on_complete` runs exactly once, on the worker thread.
pub fn spawn_parse<F>(source: FileSource, config: ParserConfig, on_complete: F) -> CancelToken
where
    F: FnOnce(Result<Vec<RowRecord>>) + Send + 'static,
{
    let token = CancelToken::default();
    let flag = token.clone();
    thread::spawn(move || {
        debug!(file = %source.name(), "csv parse started");
        let result = parse_source(&source, &config, Some(&flag.0));
        on_complete(result);
    });
    token
}

/// Single-shot result of an asynchronous parse.
pub struct ParseHandle {
    receiver: Receiver<Result<Vec<RowRecord>>>,
    token: CancelToken,
    delivered: bool,
}

/// Start parsing without blocking the caller.
pub fn parse_async(source: FileSource, config: ParserConfig) -> ParseHandle {
    let (tx, rx) = bounded(1);
    let token = spawn_parse(source, config, move |result| {
        // The handle may already be gone; nobody is waiting then.
        let _ = tx.send(result);
    });
    ParseHandle {
        receiver: rx,
        token,
        delivered: false,
    }
}

impl ParseHandle {
    /// Block until the parse completes.
    pub fn wait(self) -> Result<Vec<RowRecord>> {
        if self.delivered {
            return Err(DashboardError::Parse(
                "parse result was already taken".to_string(),
            ));
        }
        self.receiver.recv().unwrap_or_else(|_| {
            Err(DashboardError::Parse(
                "parse worker stopped without a result".to_string(),
            ))
        })
    }

    /// Block for at most `timeout`; `None` when the parse is still running.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Result<Vec<RowRecord>>> {
        if self.delivered {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.delivered = true;
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.delivered = true;
                Some(Err(DashboardError::Parse(
                    "parse worker stopped without a result".to_string(),
                )))
            }
        }
    }

    /// Non-blocking poll. Returns the outcome once, then `None` forever.
    pub fn try_result(&mut self) -> Option<Result<Vec<RowRecord>>> {
        if self.delivered {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.delivered = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.delivered = true;
                Some(Err(DashboardError::Parse(
                    "parse worker stopped without a result".to_string(),
                )))
            }
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<RowRecord>> {
        parse_bytes(input.as_bytes(), &ParserConfig::default())
    }

    #[test]
    fn test_file_format() {
        assert_eq!(FileFormat::from_path("data.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path("DATA.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path("data.parquet"), None);
        assert_eq!(FileFormat::from_path("csv"), None);
    }

    #[test]
    fn test_check_format_rejects_other_files() {
        let source = FileSource::from_bytes("report.xlsx", Vec::new());
        assert!(matches!(
            source.check_format(),
            Err(DashboardError::UnsupportedFile { .. })
        ));
        assert!(FileSource::from_path("a/b/activity.csv").check_format().is_ok());
    }

    #[test]
    fn test_header_only() {
        let rows = parse("name,age\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let rows = parse("").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_blank_and_whitespace_lines_skipped() {
        let rows = parse("\nname,age\n\nA,30\n   \nB,40\n\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some("B"));
    }

    #[test]
    fn test_bom_and_header_whitespace() {
        let rows = parse("\u{feff}name , age\nA,30\n").unwrap();
        let columns: Vec<&str> = rows[0].columns().collect();
        assert_eq!(columns, vec!["name", "age"]);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse("user,note\nalice,\"hello, world\"\n").unwrap();
        assert_eq!(rows[0].get("note"), Some("hello, world"));
    }

    #[test]
    fn test_values_not_trimmed_by_default() {
        let rows = parse("a,b\n x ,y\n").unwrap();
        assert_eq!(rows[0].get("a"), Some(" x "));

        let config = ParserConfig {
            trim_values: true,
            ..ParserConfig::default()
        };
        let rows = parse_bytes(b"a,b\n x ,y\n", &config).unwrap();
        assert_eq!(rows[0].get("a"), Some("x"));
    }

    #[test]
    fn test_all_row_errors_reported() {
        let err = parse("a,b,c\n1,2\n1,2,3\n1,2,3,4\n").unwrap_err();
        let DashboardError::Parse(message) = err else {
            panic!("expected parse error");
        };
        let parts: Vec<&str> = message.split(ERROR_SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("Too few fields"));
        assert!(parts[1].contains("Too many fields"));
    }

    #[test]
    fn test_invalid_utf8_is_row_error() {
        let input = b"a,b\n1,\xff\xfe\n";
        let err = parse_bytes(input, &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse(ref m) if m.contains("invalid UTF-8")));
    }

    #[test]
    fn test_max_rows() {
        let config = ParserConfig {
            max_rows: Some(2),
            ..ParserConfig::default()
        };
        let rows = parse_bytes(b"n\n1\n2\n3\n", &config).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let config = ParserConfig {
            delimiter: b';',
            ..ParserConfig::default()
        };
        let rows = parse_bytes(b"a;b\n1;2\n", &config).unwrap();
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_parse_async_delivers_once() {
        let source = FileSource::from_bytes("rows.csv", b"a\n1\n2\n".to_vec());
        let mut handle = parse_async(source, ParserConfig::default());
        let first = handle.wait_timeout(Duration::from_secs(5));
        assert_eq!(first.unwrap().unwrap().len(), 2);
        assert!(handle.try_result().is_none());
    }

    #[test]
    fn test_wait_after_delivery_reports_taken_result() {
        let source = FileSource::from_bytes("rows.csv", b"a\n1\n".to_vec());
        let mut handle = parse_async(source, ParserConfig::default());
        assert!(handle.wait_timeout(Duration::from_secs(5)).is_some());
        let err = handle.wait().unwrap_err();
        assert!(matches!(err, DashboardError::Parse(ref m) if m.contains("already taken")));
    }

    #[test]
    fn test_duplicate_header_is_error() {
        let err = parse("a,a,b\n1,2,3\n").unwrap_err();
        assert!(
            matches!(err, DashboardError::Parse(ref m) if m.contains("duplicate column name 'a'"))
        );
    }

    #[test]
    fn test_empty_header_name_is_error() {
        let err = parse("a,,b\n1,2,3\n").unwrap_err();
        assert!(
            matches!(err, DashboardError::Parse(ref m) if m.contains("empty column name at position 2"))
        );
    }

    #[test]
    fn test_parse_async_missing_file() {
        let handle = parse_async(
            FileSource::from_path("/definitely/not/here.csv"),
            ParserConfig::default(),
        );
        assert!(matches!(handle.wait(), Err(DashboardError::Io(_))));
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = AtomicBool::new(true);
        let result = parse_with_cancel(&b"a\n1\n"[..], &ParserConfig::default(), Some(&flag));
        assert!(matches!(result, Err(DashboardError::Cancelled)));
    }
}
