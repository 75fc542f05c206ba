//! File-backed record of items already granted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use curator_core::error::StoreError;
use curator_core::traits::GrantStore;

/// Granted-item ids persisted as a JSON array under the state directory.
///
/// The handle is created by `main`, passed down by reference, and saved
/// once after the submission phase — an explicitly lifetime-scoped
/// replacement for a process-wide dedup singleton.
#[derive(Debug)]
pub struct JsonGrantStore {
    path: PathBuf,
    granted: BTreeSet<String>,
}

impl JsonGrantStore {
    /// Load the store, treating a missing file as empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let granted = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?
        } else {
            BTreeSet::new()
        };
        Ok(Self { path, granted })
    }

    /// Persist the current set, creating parent directories as needed.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.granted)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl GrantStore for JsonGrantStore {
    fn already_granted(&self, item_id: &str) -> Result<bool, StoreError> {
        Ok(self.granted.contains(item_id))
    }

    fn mark_granted(&mut self, item_id: &str) -> Result<(), StoreError> {
        self.granted.insert(item_id.to_owned());
        Ok(())
    }
}
