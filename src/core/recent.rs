//! Bounded, deduplicated, most-recent-first history of committed queries.

use std::sync::{Arc, RwLock};

use crate::error::StorageError;
use crate::storage::session::SessionStorage;

/// Session storage key the history is persisted under
pub const RECENT_SEARCH_KEY: &str = "recent_search_words";

/// Recent-search store persisted write-through as a JSON array of strings.
///
/// Clones share the in-memory list and the backing storage, so several
/// search boxes in one session see the same history.
#[derive(Clone)]
pub struct RecentSearchStore {
    storage: Arc<dyn SessionStorage>,
    entries: Arc<RwLock<Vec<String>>>,
    capacity: usize,
}

impl std::fmt::Debug for RecentSearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchStore")
            .field("entries", &self.entries())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl RecentSearchStore {
    /// Create a store and load whatever the storage already holds.
    pub fn new(storage: Arc<dyn SessionStorage>, capacity: usize) -> Self {
        let store = Self {
            storage,
            entries: Arc::new(RwLock::new(Vec::new())),
            capacity: capacity.max(1),
        };
        store.load();
        store
    }

    /// Reload from storage. Absent or corrupt data yields an empty list.
    pub fn load(&self) -> Vec<String> {
        let loaded = match self.read_persisted() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable recent searches: {}", e);
                Vec::new()
            }
        };

        if let Ok(mut entries) = self.entries.write() {
            *entries = loaded.clone();
        }
        loaded
    }

    fn read_persisted(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.storage.get_item(RECENT_SEARCH_KEY)? else {
            return Ok(Vec::new());
        };

        let parsed: Vec<String> =
            serde_json::from_str(&raw).map_err(|e| StorageError::Corruption {
                key: RECENT_SEARCH_KEY.to_string(),
                message: e.to_string(),
            })?;

        Ok(normalize(parsed, self.capacity))
    }

    /// Snapshot of the list, most recent first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Move `query` to the front, truncate to capacity, and persist.
    ///
    /// The in-memory list is updated even when persisting fails.
    pub fn record(&self, query: &str) -> Result<(), StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let snapshot = {
            let mut entries = self.entries.write().map_err(|_| StorageError::Corruption {
                key: RECENT_SEARCH_KEY.to_string(),
                message: "recent search lock poisoned".to_string(),
            })?;
            entries.retain(|existing| existing != query);
            entries.insert(0, query.to_string());
            entries.truncate(self.capacity);
            entries.clone()
        };

        self.persist(&snapshot)
    }

    /// Remove every entry and persist the empty list.
    pub fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        self.persist(&[])
    }

    fn persist(&self, entries: &[String]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(entries).map_err(|_| StorageError::Serialize {
            key: RECENT_SEARCH_KEY.to_string(),
        })?;
        self.storage.set_item(RECENT_SEARCH_KEY, &encoded)
    }
}

fn normalize(raw: Vec<String>, capacity: usize) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(capacity);
    for item in raw {
        let item = item.trim();
        if item.is_empty() || entries.iter().any(|existing| existing == item) {
            continue;
        }
        entries.push(item.to_string());
        if entries.len() == capacity {
            break;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::session::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    fn memory_store(capacity: usize) -> (RecentSearchStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = RecentSearchStore::new(storage.clone(), capacity);
        (store, storage)
    }

    #[test]
    fn test_record_deduplicates_to_front() {
        let (store, _) = memory_store(5);
        store.record("a").unwrap();
        store.record("b").unwrap();
        store.record("a").unwrap();

        assert_eq!(store.entries(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_record_evicts_oldest_past_capacity() {
        let (store, _) = memory_store(3);
        for query in ["q1", "q2", "q3", "q4", "q5"] {
            store.record(query).unwrap();
        }

        assert_eq!(
            store.entries(),
            vec!["q5".to_string(), "q4".to_string(), "q3".to_string()]
        );
    }

    #[test]
    fn test_record_writes_through_as_json_array() {
        let (store, storage) = memory_store(5);
        store.record("asthma").unwrap();
        store.record("  flu ").unwrap();

        assert_eq!(
            storage.get_item(RECENT_SEARCH_KEY).unwrap(),
            Some(r#"["flu","asthma"]"#.to_string())
        );
    }

    #[test]
    fn test_empty_query_is_not_recorded() {
        let (store, storage) = memory_store(5);
        store.record("   ").unwrap();

        assert!(store.entries().is_empty());
        assert_eq!(storage.get_item(RECENT_SEARCH_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_existing_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(RECENT_SEARCH_KEY, r#"["b","a","b"," ","c"]"#)
            .unwrap();

        let store = RecentSearchStore::new(storage, 2);
        assert_eq!(store.entries(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(RECENT_SEARCH_KEY, "{not an array").unwrap();

        let store = RecentSearchStore::new(storage.clone(), 5);
        assert!(store.entries().is_empty());

        store.record("asthma").unwrap();
        assert_eq!(
            storage.get_item(RECENT_SEARCH_KEY).unwrap(),
            Some(r#"["asthma"]"#.to_string())
        );
    }

    #[test]
    fn test_clones_share_history() {
        let (store, _) = memory_store(5);
        let other = store.clone();

        store.record("asthma").unwrap();
        assert_eq!(other.entries(), vec!["asthma".to_string()]);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let (store, storage) = memory_store(5);
        store.record("asthma").unwrap();
        store.clear().unwrap();

        assert!(store.entries().is_empty());
        assert_eq!(
            storage.get_item(RECENT_SEARCH_KEY).unwrap(),
            Some("[]".to_string())
        );
    }

    #[test]
    fn test_file_backed_history_survives_reload() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("history.json");

        let store = RecentSearchStore::new(Arc::new(FileStorage::new(&path)), 5);
        store.record("asthma").unwrap();
        store.record("flu").unwrap();

        let reopened = RecentSearchStore::new(Arc::new(FileStorage::new(&path)), 5);
        assert_eq!(
            reopened.entries(),
            vec!["flu".to_string(), "asthma".to_string()]
        );
    }
}
