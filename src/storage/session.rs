//! Key/value string storage with browser session-storage semantics.

use super::Result;
use crate::error::StorageError;
use crate::utils::error_helpers::convert_file_error;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-scoped storage: contents live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| StorageError::Corruption {
            key: key.to_string(),
            message: "storage lock poisoned".to_string(),
        })?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StorageError::Corruption {
            key: key.to_string(),
            message: "storage lock poisoned".to_string(),
        })?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object file, one string value per key.
///
/// Every `set_item` rewrites the whole file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| convert_file_error(e, &self.path))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corruption {
            key: self.path.to_string_lossy().to_string(),
            message: e.to_string(),
        })
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is overwritten rather than blocking every write.
        // Anything else means the file could not be read and must be kept.
        let mut items = match self.read_all() {
            Ok(items) => items,
            Err(StorageError::Corruption { .. }) => HashMap::new(),
            Err(e) => return Err(e),
        };
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| convert_file_error(e, parent))?;
            }
        }

        let content = serde_json::to_string_pretty(&items).map_err(|_| StorageError::Serialize {
            key: key.to_string(),
        })?;
        fs::write(&self.path, content).map_err(|e| convert_file_error(e, &self.path))?;

        Ok(())
    }
}
