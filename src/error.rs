//! Error types shared across the crate.
//!
//! Evaluation failures live next to the evaluator (`calculator::EvalError`);
//! everything touching the outside world is collected here.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reading from or writing to history storage.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored history is not a JSON array of strings: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("no data directory available; pass --data-dir")]
    NoDataDir,

    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

/// Failure loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
