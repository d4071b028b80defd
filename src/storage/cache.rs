// Bounded cache storage implementation
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::debug;

use crate::data::DataSet;
use super::{DataStorage, StorageError};

/// Cache entry with expiration and recency
struct CacheEntry {
    data: Arc<DataSet>,
    expires_at: Option<Instant>,
    last_used: u64,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn clear_expired(&mut self, now: Instant) {
        self.entries.retain(|name, entry| {
            let live = entry.expires_at.map_or(true, |expires| expires > now);
            if !live {
                debug!("Dataset '{}' expired", name);
            }
            live
        });
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(name, _)| name.clone());

        if let Some(name) = oldest {
            debug!("Evicting dataset '{}'", name);
            self.entries.remove(&name);
        }
    }
}

/// In-memory storage bounded by entry count (LRU) and optional time-to-live
pub struct CacheStorage {
    state: Mutex<CacheState>,
    capacity: usize,
    default_ttl: Option<Duration>,
}

impl CacheStorage {
    /// Create a cache holding at most `capacity` datasets
    pub fn new(capacity: usize) -> Self {
        CacheStorage {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
            default_ttl: None,
        }
    }

    /// Set the default time-to-live for cache entries
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Maximum number of datasets kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear expired entries from the cache
    pub fn clear_expired(&self) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.clear_expired(Instant::now());
        Ok(())
    }

    /// Clear all entries from the cache
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.entries.clear();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl DataStorage for CacheStorage {
    fn store(&self, name: &str, data: DataSet) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let now = Instant::now();
        state.clear_expired(now);

        if !state.entries.contains_key(name) && state.entries.len() >= self.capacity {
            state.evict_least_recent();
        }

        let last_used = state.next_tick();
        state.entries.insert(
            name.to_string(),
            CacheEntry {
                data: Arc::new(data),
                expires_at: self.default_ttl.map(|ttl| now + ttl),
                last_used,
            },
        );

        Ok(())
    }

    fn load(&self, name: &str) -> Result<Arc<DataSet>, StorageError> {
        let mut state = self.lock()?;
        state.clear_expired(Instant::now());

        let tick = state.next_tick();
        let entry = state
            .entries
            .get_mut(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        entry.last_used = tick;
        Ok(entry.data.clone())
    }

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let mut state = self.lock()?;
        state.clear_expired(Instant::now());

        Ok(state.entries.contains_key(name))
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let mut state = self.lock()?;

        if state.entries.remove(name).is_none() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut state = self.lock()?;
        state.clear_expired(Instant::now());

        let mut names: Vec<String> = state.entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SchemaBuilder;

    fn empty() -> DataSet {
        DataSet::new(SchemaBuilder::new().add_integer("x", false).build())
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = CacheStorage::new(2);
        cache.store("a", empty()).unwrap();
        cache.store("b", empty()).unwrap();

        // Touch "a" so "b" becomes the eviction candidate
        cache.load("a").unwrap();
        cache.store("c", empty()).unwrap();

        assert!(cache.exists("a").unwrap());
        assert!(!cache.exists("b").unwrap());
        assert!(cache.exists("c").unwrap());
        assert!(matches!(cache.load("b"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = CacheStorage::new(4).with_ttl(Duration::from_millis(0));
        cache.store("a", empty()).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        assert!(matches!(cache.load("a"), Err(StorageError::NotFound(_))));
        assert!(cache.list().unwrap().is_empty());
    }

    #[test]
    fn overwriting_does_not_evict() {
        let cache = CacheStorage::new(2);
        cache.store("a", empty()).unwrap();
        cache.store("b", empty()).unwrap();
        cache.store("a", empty()).unwrap();

        assert_eq!(cache.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
