use std::path::{Path, PathBuf};

use insights_core::error::{InsightsError, Result};
use insights_data::reader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    // Map the CLI level names to tracing directives (tracing uses lowercase
    // and has no critical level).
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        other => other,
    };

    let filter = EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-path resolution ───────────────────────────────────────────────────────

/// Resolve the dataset CSV file to load.
///
/// An explicit path pointing at a file is used as-is; pointing at a directory
/// selects the first CSV discovered inside it (lexicographic order). Without
/// an explicit path the well-known locations are scanned in order:
/// 1. `./data`
/// 2. `.`
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if path.is_dir() {
            return reader::find_csv_files(path)
                .into_iter()
                .next()
                .ok_or_else(|| InsightsError::NoDataFiles(path.to_path_buf()));
        }
        return Err(InsightsError::DataPathNotFound(path.to_path_buf()));
    }

    let candidates = [PathBuf::from("./data"), PathBuf::from(".")];
    for candidate in candidates {
        if !candidate.is_dir() {
            continue;
        }
        if let Some(found) = reader::find_csv_files(&candidate).into_iter().next() {
            return Ok(found);
        }
    }

    Err(InsightsError::NoDataFiles(PathBuf::from("./data")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
