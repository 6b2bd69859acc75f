//! In-memory response cache with a fixed time-to-live.
//!
//! Entries are never removed: a stale entry is treated as absent on read and
//! overwritten by the next write for the same key. Memory therefore grows with
//! the number of distinct keys for the life of the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Build a cache key by joining its parts with `::`
///
/// Callers pass an empty string for absent optional parts so that the
/// position of every part stays fixed.
pub fn cache_key(parts: &[&str]) -> String {
    parts.join("::")
}

struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Keyed cache whose entries expire `ttl` after they were written
pub struct TtlCache<V> {
    /// Label used in logs
    name: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh value; stale entries read as a miss
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!(cache = self.name, key = key, "Cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!(cache = self.name, key = key, "Cache entry stale");
                None
            }
            None => {
                debug!(cache = self.name, key = key, "Cache miss");
                None
            }
        }
    }

    /// Store a value with a fresh timestamp, replacing any previous entry
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        debug!(cache = self.name, key = %key, "Cache stored");
        self.lock().insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Entries are replaced whole, so a poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
