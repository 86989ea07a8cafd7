//! Runtime configuration.
//!
//! Defaults, then an optional JSON file, then `HARDWARE_STORE_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SNAPSHOT_PATH: &str = "database.json";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_CHANNEL_BUFFER: usize = 32;

pub const ENV_SNAPSHOT: &str = "HARDWARE_STORE_SNAPSHOT";
pub const ENV_LOG_LEVEL: &str = "HARDWARE_STORE_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "HARDWARE_STORE_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the whole-store snapshot is read at startup and written at shutdown.
    pub snapshot_path: PathBuf,
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub log_level: String,
    /// Append log lines to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// Capacity of the store and input request channels.
    pub channel_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
        }
    }
}

impl Config {
    /// Loads `path` if given (a missing file is an error), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `HARDWARE_STORE_*` overrides. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());
        if let Some(path) = lookup(ENV_SNAPSHOT) {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(path) = lookup(ENV_LOG_FILE) {
            self.log_file = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be at least 1".into()));
        }
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("snapshot_path must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.snapshot_path, PathBuf::from("database.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_file, None);
        assert_eq!(config.channel_buffer, 32);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{ "log_level": "debug", "channel_buffer": 8 }"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.channel_buffer, 8);
        assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from_file(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load_from_file(&dir.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SNAPSHOT, "/tmp/store.json"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_FILE, "  "),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/store.json"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_zero_buffer_is_invalid() {
        let config = Config {
            channel_buffer: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
