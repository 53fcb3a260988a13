#![allow(dead_code)]

mod notifier;
mod release_index;

pub use notifier::RecordingNotifier;
pub use release_index::{mock_release_index, release_index_html, source_for};

use std::sync::Arc;

use tempfile::TempDir;

use chromium_update_notifier::version::store::{SettingsStore, UpdateStore};
use chromium_update_notifier::version::types::RecordPatch;

/// Create a settings store in a temporary directory with the given current version
pub fn create_test_store(current_version: &str) -> (TempDir, Arc<SettingsStore>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let store = SettingsStore::new(&db_path).unwrap();

    store
        .set(RecordPatch {
            current_version: Some(current_version.to_string()),
            ..Default::default()
        })
        .unwrap();

    (temp_dir, Arc::new(store))
}
