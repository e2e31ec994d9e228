//! Error types for report generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Bucket width alias could not be parsed.
    #[error("invalid bucket width '{value}': {reason}")]
    InvalidBucketWidth { value: String, reason: &'static str },

    /// Image format not compiled into this build.
    #[error("{format} export is not available in this build (enable the `png` feature)")]
    UnsupportedFormat { format: &'static str },

    /// Resampling could not produce a bucket series.
    #[error("resampling failed: {message}")]
    Resample { message: String },

    /// Failed to write the chart file.
    #[error("failed to write chart {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No Kaleido executable was found for PNG export.
    #[error("PNG export needs the Kaleido executable: point {env} at its directory or use --format html")]
    ExporterUnavailable { env: &'static str },

    /// The exporter failed or returned without producing the file.
    #[error("chart export to {path} failed")]
    ExportFailed { path: PathBuf },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
