//! Bounded, expiring in-memory caches for register lookups.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Capacity and time-to-live for one named cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub capacity: usize,
    pub ttl: Duration,
}

impl CacheSettings {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity, ttl }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Policy for each register operation's cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub roles: CacheSettings,
    pub related_errands: CacheSettings,
    pub errand: CacheSettings,
    pub document_type: CacheSettings,
}

impl Default for CacheConfig {
    fn default() -> Self {
        const HOUR: u64 = 60 * 60;
        Self {
            roles: CacheSettings::new(1, Duration::from_secs(24 * HOUR)),
            related_errands: CacheSettings::new(500, Duration::from_secs(HOUR)),
            errand: CacheSettings::new(500, Duration::from_secs(HOUR)),
            document_type: CacheSettings::new(1000, Duration::from_secs(24 * HOUR)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct CacheEntry<V> {
    value: V,
    written_at: DateTime<Utc>,
    last_used: u64,
}

struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    tick: u64,
    hits: u64,
    misses: u64,
}

/// Cache-aside store: expired entries vanish on read, the least recently used
/// entry is evicted when a write would exceed capacity.
///
/// The lock is not held while a value is loaded, so concurrent misses on the
/// same key may each load it.
pub(crate) struct ExpiringCache<K, V> {
    name: &'static str,
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub(crate) fn new(name: &'static str, settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            settings,
            clock,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.tick += 1;
        let tick = state.tick;

        let expired = match state.entries.get_mut(key) {
            Some(entry) if !self.is_expired(entry.written_at, now) => {
                entry.last_used = tick;
                let value = entry.value.clone();
                state.hits += 1;
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.remove(key);
        }
        state.misses += 1;
        None
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        if self.settings.capacity == 0 {
            return;
        }

        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.tick += 1;
        let tick = state.tick;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.settings.capacity {
            state
                .entries
                .retain(|_, entry| !self.is_expired(entry.written_at, now));
        }
        if !state.entries.contains_key(&key) && state.entries.len() >= self.settings.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                value,
                written_at: now,
                last_used: tick,
            },
        );
    }

    /// Return the cached value, or load, store and return it. Load errors are not cached.
    pub(crate) fn get_or_try_insert_with<E, F>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = load()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    pub(crate) fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
    }

    fn is_expired(&self, written_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(written_at).to_std() {
            Ok(age) => age >= self.settings.ttl,
            Err(_) => false,
        }
    }
}
