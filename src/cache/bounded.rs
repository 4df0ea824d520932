//! Capacity-bounded in-process store

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use super::store::KeyValueStore;
use crate::error::CacheError;

/// Least-recently-used store; evicts once `capacity` entries are held
#[derive(Debug)]
pub struct LruStore {
    entries: Mutex<LruCache<String, String>>,
}

impl LruStore {
    /// A zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for LruStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.lock().put(key.to_string(), value);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.lock().contains(key))
    }
}
