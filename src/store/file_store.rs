//! JSON file store
//!
//! Keeps every value in one flat JSON object, e.g.
//! `~/.local/share/focus-ring/store.json`. Each write rewrites the whole
//! file through a sibling `.tmp` file that is renamed into place, so a crash
//! mid-write leaves the previous contents intact.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::PersistenceError;

/// Write-through store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing or corrupt file is treated as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, key: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    PersistenceError::new(key, format!("create {}: {}", parent.display(), e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| PersistenceError::new(key, e.to_string()))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(|e| {
            PersistenceError::new(key, format!("write {}: {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            PersistenceError::new(key, format!("replace {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush(key)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), PersistenceError> {
        let Some((first_key, _)) = entries.first() else {
            return Ok(());
        };

        for (key, value) in entries {
            self.values.insert(key.to_string(), value.clone());
        }
        self.flush(first_key)
    }
}
