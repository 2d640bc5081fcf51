//! Error types for configuration and log-directory watching

use std::path::PathBuf;
use thiserror::Error;

/// Errors while waiting for the encounter log to appear
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("log directory {path} does not exist")]
    MissingDirectory { path: PathBuf },

    #[error("failed to initialize file watcher")]
    InitWatcher(#[source] notify::Error),

    #[error("failed to watch path {path}")]
    WatchPath {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("file watcher stopped before {path} appeared")]
    Closed { path: PathBuf },
}

/// Configuration errors. Surfaced once at startup, never per line.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("gear set table {path} not found")]
    MissingGearTable { path: PathBuf },

    #[error("failed to read gear set table {path}")]
    ReadGearTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gear set table {path}")]
    ParseGearTable {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("retained_encounters must be at least 1")]
    InvalidRetention,
}
