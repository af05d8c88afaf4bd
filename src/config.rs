//! Spokely configuration.
//!
//! Loaded from `~/.spokely/config.toml`. Every key is optional and a missing
//! file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Spokely configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Where work orders and the event log are kept.
    /// Defaults to `~/.spokely/`. `--data-dir` overrides it.
    pub data_dir: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset (e.g. `"info"`, `"spokely=debug"`).
    pub log_level: String,

    /// How many events `spokely events` shows without `--limit`.
    pub recent_events: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            recent_events: 10,
        }
    }
}

impl Config {
    /// Load config from `~/.spokely/config.toml`.
    ///
    /// Falls back to defaults when there is no home directory or no file.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path. A missing file is all defaults;
    /// an unreadable or invalid one is an error naming the path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.spokely/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spokely").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.recent_events, 10);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data-dir = \"/srv/spokely\"\nrecent-events = 25\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/spokely")));
        assert_eq!(config.recent_events, 25);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recent-events = \"lots\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"/tmp\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
