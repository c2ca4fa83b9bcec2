//! Application configuration.
//!
//! Defaults, overridden by an optional JSON file, then by the
//! `NJ_LIBRARY_DATA_DIR` environment variable, then by the first
//! command-line argument (data directory).

use crate::error::Result;
use crate::views::{DEFAULT_LEADERBOARD_SIZE, DEFAULT_TREND_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "nj_library_explorer.json";
/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "NJ_LIBRARY_CONFIG";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NJ_LIBRARY_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one spreadsheet per report year.
    pub data_dir: PathBuf,
    /// Where search exports and chart images are written.
    pub export_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub leaderboard_size: usize,
    pub trend_window: usize,
    /// Skip source files whose name is not a calendar year.
    pub validate_year_tags: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            export_dir: PathBuf::from("."),
            log_filter: "info".to_string(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            trend_window: DEFAULT_TREND_WINDOW,
            validate_year_tags: false,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read `path` if it exists; a missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_json(&text)
    }

    /// Full resolution: file, environment, then command-line argument.
    pub fn load(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        let config = Self::from_file(&path)?;
        Ok(config.with_overrides(std::env::var(DATA_DIR_ENV).ok(), args.into_iter().next()))
    }

    fn with_overrides(mut self, env_dir: Option<String>, arg_dir: Option<String>) -> Self {
        if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = arg_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self.leaderboard_size = self.leaderboard_size.max(1);
        self.trend_window = self.trend_window.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "data_dir": "reports", "leaderboard_size": 10 }"#)
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("reports"));
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.trend_window, 5);
        assert!(!config.validate_year_tags);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = AppConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::error::ExplorerError::Config(_)));
    }

    #[test]
    fn test_argument_beats_environment() {
        let config = AppConfig::default()
            .with_overrides(Some("env_dir".to_string()), Some("arg_dir".to_string()));
        assert_eq!(config.data_dir, PathBuf::from("arg_dir"));

        let config = AppConfig::default().with_overrides(Some("env_dir".to_string()), None);
        assert_eq!(config.data_dir, PathBuf::from("env_dir"));
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let config = AppConfig {
            leaderboard_size: 0,
            trend_window: 0,
            ..AppConfig::default()
        }
        .with_overrides(None, None);
        assert_eq!(config.leaderboard_size, 1);
        assert_eq!(config.trend_window, 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::from_file(Path::new("/definitely/not/here.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
