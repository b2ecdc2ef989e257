use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use log::debug;
use serde_json::Value;

use super::{Cache, CacheKey, Resource};

struct Entry {
    value: Value,
    inserted: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.inserted) < self.ttl
    }
}

/// A memory-based cache that keeps every entry in one map. Expired entries are
/// dropped lazily, when they are read.
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CacheKey, Entry>>> {
        match self.entries.lock() {
            Ok(entries) => Ok(entries),
            Err(_) => bail!("memory cache lock poisoned"),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        let mut entries = self.lock()?;
        let fresh = match entries.get(key) {
            Some(entry) => entry.is_fresh(Instant::now()),
            None => return Ok(None),
        };
        if !fresh {
            debug!("Cache entry '{key}' expired");
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: CacheKey, value: Value, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value,
            inserted: Instant::now(),
            ttl,
        };
        self.lock()?.insert(key, entry);
        Ok(())
    }

    fn invalidate(&self, key: Option<&CacheKey>) -> Result<()> {
        let mut entries = self.lock()?;
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
        Ok(())
    }

    fn invalidate_resource(&self, resource: Resource) -> Result<()> {
        self.lock()?.retain(|key, _| key.resource != resource);
        Ok(())
    }
}
