//! File discovery and log type classification.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// File name of the connection log export.
pub const CONN_LOG_FILE: &str = "conn.log.csv";

/// File name of the file-transfer log export.
pub const FILES_LOG_FILE: &str = "files.log.csv";

const LOG_SUFFIX: &str = ".log.csv";

/// A log export on disk, classified by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// File name component of `path` (e.g. `conn.log.csv`).
    pub file_name: String,
    /// Log type derived from the file name (e.g. `conn`).
    pub log_type: String,
}

impl LogSource {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
            .to_string();
        let log_type = log_type_from_file_name(&file_name);
        Self {
            path: path.to_path_buf(),
            file_name,
            log_type,
        }
    }

    /// Whether this is the connection log (`conn.log.csv`).
    pub fn is_conn(&self) -> bool {
        self.file_name == CONN_LOG_FILE
    }

    /// Whether this is the file-transfer log (`files.log.csv`).
    pub fn is_files(&self) -> bool {
        self.file_name == FILES_LOG_FILE
    }
}

/// Strips the export suffix from a file name.
///
/// - `conn.log.csv` -> `conn`
/// - `weird.csv` -> `weird`
/// - `.log.csv` -> `` (empty, no log type)
fn log_type_from_file_name(file_name: &str) -> String {
    file_name
        .strip_suffix(LOG_SUFFIX)
        .or_else(|| file_name.strip_suffix(".csv"))
        .unwrap_or(file_name)
        .to_string()
}

/// Lists all CSV files in a directory (non-recursive).
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &["dns.log.csv", "conn.log.csv", "notes.txt", "http.log.CSV"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "ts\n1\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir();
        let files = list_csv_files(dir.path()).unwrap();

        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["conn.log.csv", "dns.log.csv", "http.log.CSV"]);
    }

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let result = list_csv_files(&dir.path().join("missing"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_log_type_from_file_name() {
        assert_eq!(log_type_from_file_name("conn.log.csv"), "conn");
        assert_eq!(log_type_from_file_name("files.log.csv"), "files");
        assert_eq!(log_type_from_file_name("weird.csv"), "weird");
        assert_eq!(log_type_from_file_name(".log.csv"), "");
    }

    #[test]
    fn test_log_source_classification() {
        let conn = LogSource::from_path(Path::new("/data/conn.log.csv"));
        assert!(conn.is_conn());
        assert!(!conn.is_files());
        assert_eq!(conn.log_type, "conn");

        let files = LogSource::from_path(Path::new("files.log.csv"));
        assert!(files.is_files());
        assert!(!files.is_conn());
    }
}
