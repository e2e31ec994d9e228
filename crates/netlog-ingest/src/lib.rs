//! Network log ingestion utilities.
//!
//! This crate turns tabular network-traffic log exports (one CSV per log
//! type, e.g. `conn.log.csv`, `dns.log.csv`, `files.log.csv`) into a single
//! stream of [`NormalizedRecord`]s with a fixed four-field shape.
//!
//! # Features
//!
//! - **CSV Loading**: Read a log export into a Polars `DataFrame` with the
//!   log's missing-value markers mapped to null
//! - **File Discovery**: Find the CSV exports in a directory and classify them by log type
//! - **Normalization**: Resolve protocol, byte count and timestamp from heterogeneous columns
//! - **Loading**: Combine every export of a directory into one [`CombinedDataset`]
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use netlog_ingest::{load_all_csvs, load_and_standardize_log};
//!
//! let combined = load_all_csvs(Path::new("csv"));
//! let conn = load_and_standardize_log(Path::new("csv/conn.log.csv"));
//! ```

mod csv;
mod discovery;
mod error;
mod loader;
mod normalize;
mod record;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{MISSING_MARKERS, RawLog, read_raw_log};

// === File Discovery ===
pub use discovery::{CONN_LOG_FILE, FILES_LOG_FILE, LogSource, list_csv_files};

// === Normalization ===
pub use normalize::{
    ByteSource, ProtocolSource, UNKNOWN_LOG_TYPE, UNKNOWN_PROTOCOL, UNKNOWN_SERVICE, normalize_log,
};

// === Loading ===
pub use loader::{load_all_csvs, load_and_standardize_log};

// === Records ===
pub use record::{CombinedDataset, NORMALIZED_COLUMNS, NormalizedRecord};

// === Value Coercion ===
pub use values::{coerce_bytes, epoch_to_datetime, parse_f64};
