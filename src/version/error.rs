use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Invalid stored value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),
}

/// Reasons a check cycle ends in the failed state
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to fetch release page: {0}")]
    Fetch(#[from] FetchError),

    #[error("No version found on release page")]
    NoVersionFound,

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

/// Invalid user input rejected before anything is saved
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Current version must not be empty")]
    EmptyVersion,

    #[error("Update period must be \"never\" or between 1 and 365 days, got {0:?}")]
    PeriodOutOfRange(String),

    #[error("Unknown architecture {0:?}, expected one of x64, x86, arm")]
    UnknownArchitecture(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
