//! Loading of single exports and whole export directories.

use std::path::Path;

use tracing::{info, warn};

use crate::csv::read_raw_log;
use crate::discovery::list_csv_files;
use crate::normalize::normalize_log;
use crate::record::{CombinedDataset, NormalizedRecord};
use crate::values::coerce_bytes;

/// Reads and normalizes one export.
///
/// Returns `None` (after logging the file and the cause) when the file cannot
/// be read or parsed. A readable file without data rows yields `Some(vec![])`.
pub fn load_and_standardize_log(path: &Path) -> Option<Vec<NormalizedRecord>> {
    let raw = match read_raw_log(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), %error, "skipping log export");
            return None;
        }
    };
    let records: Vec<NormalizedRecord> = normalize_log(&raw).collect();
    info!(
        file = %raw.source.file_name,
        log_type = %raw.source.log_type,
        rows = raw.height(),
        records = records.len(),
        "normalized log export"
    );
    Some(records)
}

/// Loads every `*.csv` export of `dir` into one dataset.
///
/// Files are processed in file-name order and their records appended in row
/// order. Failing files are skipped. A missing directory or one without
/// usable exports yields an empty dataset.
pub fn load_all_csvs(dir: &Path) -> CombinedDataset {
    let files = match list_csv_files(dir) {
        Ok(files) => files,
        Err(error) => {
            warn!(dir = %dir.display(), %error, "cannot list log exports");
            Vec::new()
        }
    };

    let mut combined = CombinedDataset::new();
    let mut loaded = 0usize;
    for path in &files {
        if let Some(records) = load_and_standardize_log(path) {
            loaded += 1;
            combined.extend(records);
        }
    }

    // Same guarantees as a single file, whatever the per-file sources were.
    let combined: CombinedDataset = combined
        .into_records()
        .into_iter()
        .map(|mut record| {
            record.total_bytes = coerce_bytes(record.total_bytes);
            record
        })
        .collect();

    info!(
        dir = %dir.display(),
        files = files.len(),
        loaded,
        records = combined.len(),
        "combined log exports"
    );
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_standardize_log_unreadable() {
        let dir = TempDir::new().unwrap();
        assert!(load_and_standardize_log(&dir.path().join("conn.log.csv")).is_none());
    }

    #[test]
    fn test_load_all_csvs_missing_dir() {
        let dir = TempDir::new().unwrap();
        let combined = load_all_csvs(&dir.path().join("missing"));
        assert!(combined.is_empty());
        assert_eq!(combined.columns().len(), 4);
    }
}
