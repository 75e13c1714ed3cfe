use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the EV Insights engine.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV dataset files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_unreadable() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = InsightsError::SourceUnreadable {
            path: PathBuf::from("/some/registrations.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read dataset"));
        assert!(msg.contains("/some/registrations.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = InsightsError::DataPathNotFound(PathBuf::from("/missing/dir"));
        let msg = err.to_string();
        assert_eq!(msg, "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_data_files() {
        let err = InsightsError::NoDataFiles(PathBuf::from("/empty/dir"));
        let msg = err.to_string();
        assert_eq!(msg, "No CSV files found in /empty/dir");
    }

    #[test]
    fn test_error_display_config() {
        let err = InsightsError::Config("bad view name".to_string());
        let msg = err.to_string();
        assert_eq!(msg, "Configuration error: bad view name");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InsightsError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: InsightsError = json_err.into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to parse JSON"));
    }
}
