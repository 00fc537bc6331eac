use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use crate::api::models::Candidate;

/// Default lifetime of a cached lookup result
pub const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(300);

/// Cache entry with TTL support
#[derive(Debug, Clone)]
struct TtlEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> TtlEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// TTL-based in-memory cache with thread-safe access.
///
/// Every entry carries its own TTL. Clones share the same storage.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    storage: Arc<RwLock<HashMap<K, TtlEntry<V>>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value from the cache, evicting it if expired
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_entry(key).map(|entry| entry.value)
    }

    fn get_entry(&self, key: &K) -> Option<TtlEntry<V>> {
        let mut storage = self.storage.write().ok()?;

        match storage.get(key) {
            Some(entry) if entry.is_expired() => {
                storage.remove(key);
                None
            }
            Some(entry) => Some(entry.clone()),
            None => None,
        }
    }

    /// Insert a value, replacing any previous entry
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        if let Ok(mut storage) = self.storage.write() {
            storage.insert(key, TtlEntry::new(value, ttl));
        }
    }
}

/// A full snapshot of the candidates returned for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Query → candidates cache shared by every search box in the session.
///
/// Entries are replaced wholesale on `put` and evicted lazily on `get` once
/// their TTL has passed. There is no size bound.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: TtlCache<String, Vec<Candidate>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<CacheEntry> {
        let key = query.to_string();
        self.entries.get_entry(&key).map(|entry| CacheEntry {
            query: key,
            candidates: entry.value,
            stored_at: entry.stored_at,
            ttl: entry.ttl,
        })
    }

    pub fn put(&self, query: &str, candidates: Vec<Candidate>, ttl: Duration) {
        self.entries
            .insert_with_ttl(query.to_string(), candidates, ttl);
    }
}
