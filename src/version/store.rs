//! Key-value settings store backed by SQLite

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::config::{Architecture, UpdatePeriod};
use crate::version::error::StoreError;
use crate::version::types::{Indicator, RecordPatch, UpdateRecord};

const KEY_CURRENT_VERSION: &str = "currentVersion";
const KEY_ARCHITECTURE: &str = "architecture";
const KEY_UPDATE_PERIOD: &str = "updatePeriod";
const KEY_LATEST_VERSION: &str = "latestVersion";
const KEY_PAGE_URL: &str = "pageUrl";
const KEY_LAST_CHECKED: &str = "lastChecked";
const KEY_ERROR: &str = "error";
const KEY_INDICATOR: &str = "indicator";

/// Repository for the persisted [`UpdateRecord`]
#[cfg_attr(test, automock)]
pub trait UpdateStore: Send + Sync + 'static {
    /// Read the whole record, with defaults for anything never written
    fn get(&self) -> Result<UpdateRecord, StoreError>;

    /// Write every field present in the patch in one atomic step
    fn set(&self, patch: RecordPatch) -> Result<(), StoreError>;

    /// Write default settings if none exist yet.
    ///
    /// Returns true on the very first run.
    fn initialize(&self) -> Result<bool, StoreError>;
}

pub struct SettingsStore {
    conn: Mutex<Connection>,
}

impl SettingsStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Initializing settings database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode so `status` can read while `watch` writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Settings store initialized successfully");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    fn load_values(&self) -> Result<HashMap<String, Option<String>>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")?;

        let values = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<Result<HashMap<String, Option<String>>, _>>()?;

        Ok(values)
    }
}

fn patch_entries(patch: RecordPatch) -> Vec<(&'static str, Option<String>)> {
    let mut entries = Vec::new();

    if let Some(v) = patch.current_version {
        entries.push((KEY_CURRENT_VERSION, Some(v)));
    }
    if let Some(v) = patch.architecture {
        entries.push((KEY_ARCHITECTURE, Some(v.as_str().to_string())));
    }
    if let Some(v) = patch.update_period {
        entries.push((KEY_UPDATE_PERIOD, Some(v.to_string())));
    }
    if let Some(v) = patch.latest_version {
        entries.push((KEY_LATEST_VERSION, Some(v)));
    }
    if let Some(v) = patch.page_url {
        entries.push((KEY_PAGE_URL, Some(v)));
    }
    if let Some(v) = patch.last_checked {
        entries.push((KEY_LAST_CHECKED, Some(v)));
    }
    if let Some(v) = patch.error {
        entries.push((KEY_ERROR, v));
    }
    if let Some(v) = patch.indicator {
        entries.push((KEY_INDICATOR, Some(v.as_str().to_string())));
    }

    entries
}

fn parse_value<T: std::str::FromStr>(
    key: &'static str,
    value: Option<&String>,
) -> Result<Option<T>, StoreError> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|_| StoreError::InvalidValue {
                key,
                value: v.clone(),
            })
        })
        .transpose()
}

impl UpdateStore for SettingsStore {
    fn get(&self) -> Result<UpdateRecord, StoreError> {
        let values = self.load_values()?;
        let value = |key: &str| values.get(key).and_then(|v| v.as_ref());

        let defaults = UpdateRecord::default();

        Ok(UpdateRecord {
            current_version: value(KEY_CURRENT_VERSION)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or(defaults.current_version),
            architecture: parse_value::<Architecture>(KEY_ARCHITECTURE, value(KEY_ARCHITECTURE))?
                .unwrap_or(defaults.architecture),
            update_period: parse_value::<UpdatePeriod>(
                KEY_UPDATE_PERIOD,
                value(KEY_UPDATE_PERIOD),
            )?
            .unwrap_or(defaults.update_period),
            latest_version: value(KEY_LATEST_VERSION).cloned(),
            page_url: value(KEY_PAGE_URL).cloned(),
            last_checked: value(KEY_LAST_CHECKED).cloned(),
            error: value(KEY_ERROR).cloned(),
            indicator: parse_value::<Indicator>(KEY_INDICATOR, value(KEY_INDICATOR))?,
        })
    }

    fn set(&self, patch: RecordPatch) -> Result<(), StoreError> {
        let entries = patch_entries(patch);
        if entries.is_empty() {
            return Ok(());
        }

        debug!(
            "Saving settings: {:?}",
            entries.iter().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        let now = Self::current_timestamp_ms();
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO settings (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )?;
            for (key, value) in &entries {
                stmt.execute((key, value, now))?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn initialize(&self) -> Result<bool, StoreError> {
        let defaults = UpdateRecord::default();
        let now = Self::current_timestamp_ms();

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;

        {
            // INSERT OR IGNORE keeps anything the user already saved
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            )?;
            stmt.execute((KEY_CURRENT_VERSION, &defaults.current_version, now))?;
            stmt.execute((KEY_ARCHITECTURE, defaults.architecture.as_str(), now))?;
            stmt.execute((KEY_UPDATE_PERIOD, defaults.update_period.to_string(), now))?;
        }

        tx.commit()?;

        let first_run = existing == 0;
        if first_run {
            info!("Created default settings");
        }
        Ok(first_run)
    }
}
