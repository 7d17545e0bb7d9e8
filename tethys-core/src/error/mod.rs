//! Core error types for Tethys

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tethys operations
#[derive(Error, Debug)]
pub enum TethysError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Annotation store missing: {path} (re-download or rebuild the store)")]
    StoreMissing { path: PathBuf },

    #[error(
        "Annotation store version mismatch: {path} has version {found}, \
         this release requires {required} (re-download the annotation store)"
    )]
    StoreVersion {
        path: PathBuf,
        found: String,
        required: String,
    },

    #[error("Annotation store is not ready for reads: {0}")]
    StoreNotReady(String),

    #[error("Hit table missing: {path} (re-run the aligner for this database)")]
    HitTableMissing { path: PathBuf },

    #[error("Malformed hit table {path} at line {line}: {reason} (re-run the aligner)")]
    HitTableParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("No reference database produced a usable hit table")]
    NoDatabasesUsable,

    #[error("No query sequences survived consolidation and none are no-hit candidates")]
    NoSequencesKept,
}

/// Result type alias for Tethys operations
pub type TethysResult<T> = Result<T, TethysError>;

impl From<serde_json::Error> for TethysError {
    fn from(err: serde_json::Error) -> Self {
        TethysError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let io_error = TethysError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(format!("{}", io_error).contains("IO error"));

        let config_error = TethysError::Configuration("missing field".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: missing field"
        );

        let parse_error = TethysError::Parse("invalid syntax".to_string());
        assert_eq!(format!("{}", parse_error), "Parsing error: invalid syntax");
    }

    #[test]
    fn test_store_errors_name_the_path_and_remedy() {
        let missing = TethysError::StoreMissing {
            path: PathBuf::from("/data/tethys.db"),
        };
        let msg = format!("{}", missing);
        assert!(msg.contains("/data/tethys.db"));
        assert!(msg.contains("rebuild"));

        let version = TethysError::StoreVersion {
            path: PathBuf::from("/data/tethys.db"),
            found: "1.0".to_string(),
            required: "2.0".to_string(),
        };
        let msg = format!("{}", version);
        assert!(msg.contains("1.0"));
        assert!(msg.contains("2.0"));
        assert!(msg.contains("re-download"));
    }

    #[test]
    fn test_hit_table_errors_distinguish_missing_from_malformed() {
        let missing = TethysError::HitTableMissing {
            path: PathBuf::from("hits/nr.tsv"),
        };
        assert!(format!("{}", missing).contains("re-run the aligner"));

        let malformed = TethysError::HitTableParse {
            path: PathBuf::from("hits/nr.tsv"),
            line: 42,
            reason: "expected 14 columns, found 9".to_string(),
        };
        let msg = format!("{}", malformed);
        assert!(msg.contains("line 42"));
        assert!(msg.contains("14 columns"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let tethys_err: TethysError = io_err.into();

        match tethys_err {
            TethysError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_error_result_type() {
        fn returns_err() -> TethysResult<String> {
            Err(TethysError::NotFound("item".to_string()))
        }

        match returns_err().unwrap_err() {
            TethysError::NotFound(msg) => assert_eq!(msg, "item"),
            _ => panic!("Expected NotFound error"),
        }
    }
}
