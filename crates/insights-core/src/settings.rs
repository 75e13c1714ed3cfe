use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregated insights over an electric-vehicle registration dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ev-insights",
    about = "Aggregated insights over an electric-vehicle registration dataset",
    version
)]
pub struct Settings {
    /// Dataset CSV file, or a directory to scan for CSV files
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// View to render
    #[arg(
        long,
        default_value = "summary",
        value_parser = [
            "summary", "counties", "years", "makes", "models", "ranges",
            "utilities", "full",
        ]
    )]
    pub view: String,

    /// Maximum entries shown in ranked views (1-100)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub top: u16,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.ev-insights/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.ev-insights/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".ev-insights").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to the default path, creating parent directories
    /// if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the default config file if it exists.
    pub fn clear() -> Result<(), std::io::Error> {
        Self::clear_at(&Self::config_path())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`load_with_last_used`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_with_last_used_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::load_with_last_used_impl(args, &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            // Apply the debug override and return without re-persisting.
            return Self::apply_debug_override(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on the
        // command line (CLI always wins).
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "data_path") && settings.data_path.is_none() {
            settings.data_path = last.data_path;
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top") {
            if let Some(v) = last.top {
                settings.top = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings = Self::apply_debug_override(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` forces the log level regardless of `--log-level`.
    fn apply_debug_override(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_path: s.data_path.clone(),
            view: Some(s.view.clone()),
            top: Some(s.top),
            format: Some(s.format.clone()),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build the config path inside `tmp`.
    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    /// Save `params` to `tmp`, then load them back.
    fn round_trip(tmp: &TempDir, params: &LastUsedParams) -> LastUsedParams {
        let path = tmp_config_path(tmp);
        params.save_to(&path).expect("save");
        LastUsedParams::load_from(&path)
    }

    // ── test_last_used_params_save_load ───────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let params = LastUsedParams {
            data_path: Some(PathBuf::from("/data/registrations.csv")),
            view: Some("counties".to_string()),
            top: Some(25),
            format: Some("json".to_string()),
        };

        let loaded = round_trip(&tmp, &params);

        assert_eq!(
            loaded.data_path,
            Some(PathBuf::from("/data/registrations.csv"))
        );
        assert_eq!(loaded.view, Some("counties".to_string()));
        assert_eq!(loaded.top, Some(25));
        assert_eq!(loaded.format, Some("json".to_string()));
    }

    // ── test_last_used_params_clear ───────────────────────────────────────────

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        // Save something first.
        let params = LastUsedParams {
            view: Some("years".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        // Clear it.
        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    // ── test_last_used_params_default_when_missing ────────────────────────────

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        // No file created – load should return default.
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.data_path.is_none());
        assert!(loaded.view.is_none());
        assert!(loaded.top.is_none());
        assert!(loaded.format.is_none());
    }

    // ── test_settings_default_values ─────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        // Parse with only the binary name (no flags) to get all defaults.
        let settings = Settings::parse_from(["ev-insights"]);

        assert!(settings.data_path.is_none());
        assert_eq!(settings.view, "summary");
        assert_eq!(settings.top, 10);
        assert_eq!(settings.format, "table");
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    // ── test_from_settings_to_last_used ──────────────────────────────────────

    #[test]
    fn test_from_settings_to_last_used() {
        let settings = Settings {
            data_path: Some(PathBuf::from("/data")),
            view: "models".to_string(),
            top: 20,
            format: "json".to_string(),
            log_level: "INFO".to_string(),
            debug: false,
            clear: false,
        };

        let last = LastUsedParams::from(&settings);

        assert_eq!(last.data_path, Some(PathBuf::from("/data")));
        assert_eq!(last.view, Some("models".to_string()));
        assert_eq!(last.top, Some(20));
        assert_eq!(last.format, Some("json".to_string()));
        // 'log_level' is NOT stored in LastUsedParams.
    }

    // ── test_settings_cli_parsing ─────────────────────────────────────────────

    #[test]
    fn test_settings_cli_explicit_view() {
        let settings = Settings::parse_from(["ev-insights", "--view", "ranges"]);
        assert_eq!(settings.view, "ranges");
    }

    #[test]
    fn test_settings_cli_debug_flag() {
        let settings = Settings::parse_from(["ev-insights", "--debug"]);
        assert!(settings.debug);
    }

    #[test]
    fn test_settings_cli_data_path() {
        let settings = Settings::parse_from(["ev-insights", "--data-path", "/tmp/evs.csv"]);
        assert_eq!(settings.data_path, Some(PathBuf::from("/tmp/evs.csv")));
    }

    #[test]
    fn test_settings_cli_top() {
        let settings = Settings::parse_from(["ev-insights", "--top", "5"]);
        assert_eq!(settings.top, 5);
    }

    // ── test_load_with_last_used (uses config path injection) ─────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_view() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        // Pre-populate last-used with a view.
        let params = LastUsedParams {
            view: Some("counties".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        // Parse without --view flag → should use persisted value.
        let settings = Settings::load_with_last_used_impl(vec!["ev-insights".into()], &config_path);
        assert_eq!(settings.view, "counties");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        // Pre-populate last-used with the counties view.
        let params = LastUsedParams {
            view: Some("counties".to_string()),
            top: Some(50),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        // Explicit --view years on CLI must win.
        let settings = Settings::load_with_last_used_impl(
            vec!["ev-insights".into(), "--view".into(), "years".into()],
            &config_path,
        );
        assert_eq!(settings.view, "years");
        // Unset flags still merge from persisted params.
        assert_eq!(settings.top, 50);
    }

    #[test]
    fn test_load_with_last_used_merges_data_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            data_path: Some(PathBuf::from("/data/evs.csv")),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["ev-insights".into()], &config_path);
        assert_eq!(settings.data_path, Some(PathBuf::from("/data/evs.csv")));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            view: Some("makes".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");
        assert!(config_path.exists(), "file must exist before clear");

        Settings::load_with_last_used_impl(
            vec!["ev-insights".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["ev-insights".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["ev-insights".into(), "--view".into(), "utilities".into()],
            &config_path,
        );

        // After a run the file should have been created.
        assert!(
            config_path.exists(),
            "config file must be persisted after run"
        );
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view, Some("utilities".to_string()));
    }
}
