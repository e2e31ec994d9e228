//! CSV file reading for log exports.

use std::path::Path;

use polars::prelude::*;

use crate::discovery::LogSource;
use crate::error::{IngestError, Result};

/// Cell values that mean "no value" in the exports.
pub const MISSING_MARKERS: [&str; 3] = ["-", "(empty)", ""];

/// One log export loaded as an all-string table.
#[derive(Debug, Clone)]
pub struct RawLog {
    pub source: LogSource,
    pub frame: DataFrame,
}

impl RawLog {
    pub fn new(source: LogSource, frame: DataFrame) -> Self {
        Self { source, frame }
    }

    /// Number of data rows (header excluded).
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Returns a column as trimmed text, with missing markers mapped to `None`.
    ///
    /// Returns `None` when the column does not exist.
    pub fn text_column(&self, name: &str) -> Option<Vec<Option<String>>> {
        let column = self.frame.column(name).ok()?;
        let series = column
            .cast(&DataType::String)
            .map(Column::take_materialized_series)
            .ok()?;
        let chunked = series.str().ok()?;
        Some(
            chunked
                .iter()
                .map(|value| {
                    value
                        .map(str::trim)
                        .filter(|v| !is_missing(v))
                        .map(str::to_string)
                })
                .collect(),
        )
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Check that the file exists and has content before handing it to Polars.
fn check_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Reads a log export into a [`RawLog`].
///
/// The first row is the header. Every column is read as String so that the
/// normalizer decides how each cell is coerced; `-`, `(empty)` and empty
/// cells are null.
pub fn read_raw_log(path: &Path) -> Result<RawLog> {
    check_file(path)?;

    let null_values = NullValues::AllColumns(
        MISSING_MARKERS
            .iter()
            .map(|marker| PlSmallStr::from(*marker))
            .collect(),
    );

    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| {
            options
                .with_null_values(Some(null_values.clone()))
                .with_missing_is_null(true)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let headers: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| normalize_header(name.as_str()))
        .collect();
    frame.set_column_names(headers)?;

    tracing::debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "read log export"
    );

    Ok(RawLog::new(LogSource::from_path(path), frame))
}
