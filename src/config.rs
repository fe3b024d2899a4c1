//! Configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, PersistenceError};
use crate::history::HISTORY_KEY;

const APP_DIR: &str = "zcalc";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the history is stored. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Storage key of the history log.
    pub history_key: String,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_key: HISTORY_KEY.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Ok(Self::default());
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Self::parse(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve the directory the history file lives in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, PersistenceError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PersistenceError::NoDataDir),
        }
    }
}

/// `$XDG_CONFIG_HOME/zcalc/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history_key, "calculatorHistory");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(r#"data_dir = "/tmp/zcalc""#).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/zcalc")));
        assert_eq!(config.history_key, "calculatorHistory");
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            data_dir = "/var/lib/zcalc"
            history_key = "work"
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.history_key, "work");
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.resolve_data_dir().unwrap(),
            PathBuf::from("/var/lib/zcalc")
        );
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::parse("history_limit = 10").is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "history_key = ").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
