use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::version::error::{ConfigError, SettingsError};

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetching the release index in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay before the first check after a fresh install (1 second)
pub const INSTALL_CHECK_DELAY_MS: u64 = 1_000;

/// Delay before the first check after a restart (2 seconds)
pub const STARTUP_CHECK_DELAY_MS: u64 = 2_000;

/// How often `watch` re-reads the stored update period (1 minute)
pub const SETTINGS_POLL_INTERVAL_MS: u64 = 60_000;

/// Minutes in one day, the unit of the update period
pub const MINUTES_PER_DAY: u64 = 1440;

/// Default host serving the ungoogled-chromium binaries index
pub const DEFAULT_BASE_URL: &str = "https://ungoogled-software.github.io";

/// Default User-Agent sent with release index requests
pub const DEFAULT_USER_AGENT: &str = concat!("chromium-update-notifier/", env!("CARGO_PKG_VERSION"));

/// Baseline version assumed before the user records one
pub const DEFAULT_CURRENT_VERSION: &str = "0.0.0.0";

const APP_DIR_NAME: &str = "chromium-update-notifier";

// =============================================================================
// Architecture
// =============================================================================

/// Windows build flavour whose release page is watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    #[default]
    X64,
    X86,
    Arm,
}

impl Architecture {
    pub const ALL: [Architecture; 3] = [Architecture::X64, Architecture::X86, Architecture::Arm];

    /// Returns the string representation used in the settings store
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Arm => "arm",
        }
    }

    /// Path of the release index page below the binaries host
    pub fn release_path(&self) -> &'static str {
        match self {
            Architecture::X64 => "/ungoogled-chromium-binaries/releases/windows/64bit/",
            Architecture::X86 => "/ungoogled-chromium-binaries/releases/windows/32bit/",
            Architecture::Arm => "/ungoogled-chromium-binaries/releases/windows/arm64/",
        }
    }

    /// Full release index URL under the given host
    pub fn page_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.release_path())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownArchitecture(s.to_string()))
    }
}

// =============================================================================
// Update period
// =============================================================================

/// Days between automatic checks, or `Never` to disable them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePeriod {
    Never,
    Days(u16),
}

impl UpdatePeriod {
    pub const MIN_DAYS: u16 = 1;
    pub const MAX_DAYS: u16 = 365;
    pub const PRESETS: [u16; 3] = [1, 7, 30];

    /// Interval of the periodic trigger, `None` when automatic checks are off
    pub fn interval(&self) -> Option<Duration> {
        match self {
            UpdatePeriod::Never => None,
            UpdatePeriod::Days(days) => Some(Duration::from_secs(
                u64::from(*days) * MINUTES_PER_DAY * 60,
            )),
        }
    }

    /// Whether the period is one of the preset choices rather than a custom value
    pub fn is_preset(&self) -> bool {
        match self {
            UpdatePeriod::Never => true,
            UpdatePeriod::Days(days) => Self::PRESETS.contains(days),
        }
    }
}

impl Default for UpdatePeriod {
    fn default() -> Self {
        UpdatePeriod::Days(7)
    }
}

impl fmt::Display for UpdatePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdatePeriod::Never => f.write_str("never"),
            UpdatePeriod::Days(days) => write!(f, "{}", days),
        }
    }
}

impl FromStr for UpdatePeriod {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "never" {
            return Ok(UpdatePeriod::Never);
        }

        match trimmed.parse::<u16>() {
            Ok(days) if (Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) => {
                Ok(UpdatePeriod::Days(days))
            }
            _ => Err(SettingsError::PeriodOutOfRange(s.to_string())),
        }
    }
}

// =============================================================================
// Config file
// =============================================================================

/// Application configuration read from `config.json` in the data directory
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub scheduler: SchedulerConfig,
}

/// Release index fetch configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Host serving the release index pages
    pub base_url: String,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FETCH_TIMEOUT_MS,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// How often the stored update period is re-read, in milliseconds
    pub settings_poll_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            settings_poll_ms: SETTINGS_POLL_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Loads the config file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// Paths
// =============================================================================

/// Returns the path to the data directory.
/// Uses $XDG_DATA_HOME/chromium-update-notifier if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/chromium-update-notifier,
/// or ./chromium-update-notifier if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the settings database inside `data_dir`.
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.db")
}

/// Returns the path to the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.json")
}

/// Name of the log file written inside `data_dir`.
pub const LOG_FILE_NAME: &str = "chromium-update-notifier.log";

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR_NAME)
}
