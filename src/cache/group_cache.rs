// Copyright 2024 ldml-xpath contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Thread-safe cache for logical groups
//!
//! Bounded caches use LRU eviction behind a mutex; unbounded caches (batch
//! tools that walk every path of every locale once) use a sharded map and
//! never evict.

use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Basic cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Calculate hit ratio as percentage
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

enum Storage<K, V> {
    Bounded(Mutex<LruCache<K, V>>),
    Unbounded(DashMap<K, V>),
}

/// Key/value cache that is either LRU-bounded or unbounded
pub struct GroupCache<K, V> {
    storage: Storage<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> GroupCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// `Some(n)` keeps at most `n` entries; `None` and `Some(0)` are unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        let storage = match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => Storage::Bounded(Mutex::new(LruCache::new(capacity))),
            None => Storage::Unbounded(DashMap::new()),
        };
        Self {
            storage,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Unbounded cache
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Get a value, updating LRU order and statistics
    pub fn get(&self, key: &K) -> Option<V> {
        let found = match &self.storage {
            Storage::Bounded(cache) => cache.lock().get(key).cloned(),
            Storage::Unbounded(map) => map.get(key).map(|v| v.value().clone()),
        };
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Insert a value, evicting the least recently used one when full
    pub fn insert(&self, key: K, value: V) {
        match &self.storage {
            Storage::Bounded(cache) => {
                cache.lock().put(key, value);
            }
            Storage::Unbounded(map) => {
                map.insert(key, value);
            }
        }
    }

    /// Cached value for `key`, computing it on a miss.
    ///
    /// The computation runs without holding any lock, so concurrent misses
    /// on one key may compute twice; both results are equal.
    pub fn get_or_insert_with<E>(
        &self,
        key: &K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// True when `key` is cached, without touching LRU order
    pub fn contains(&self, key: &K) -> bool {
        match &self.storage {
            Storage::Bounded(cache) => cache.lock().contains(key),
            Storage::Unbounded(map) => map.contains_key(key),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Bounded(cache) => cache.lock().len(),
            Storage::Unbounded(map) => map.len(),
        }
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity, or `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        match &self.storage {
            Storage::Bounded(cache) => Some(cache.lock().cap().get()),
            Storage::Unbounded(_) => None,
        }
    }

    /// Remove every entry and reset statistics
    pub fn clear(&self) {
        match &self.storage {
            Storage::Bounded(cache) => cache.lock().clear(),
            Storage::Unbounded(map) => map.clear(),
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_lru_eviction() {
        let cache: GroupCache<String, u32> = GroupCache::new(Some(2));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        // touch `a` so `b` becomes least recently used
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        cache.insert("c".to_string(), 3);

        assert!(cache.contains(&"a".to_string()));
        assert!(!cache.contains(&"b".to_string()));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), Some(2));
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let cache: GroupCache<u32, u32> = GroupCache::unbounded();
        for i in 0..1000 {
            cache.insert(i, i * 2);
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.capacity(), None);
        assert_eq!(cache.get(&999), Some(1998));
    }

    #[test]
    fn test_get_or_insert_with() {
        let cache: GroupCache<&'static str, usize> = GroupCache::new(Some(8));
        let mut calls = 0;
        for _ in 0..3 {
            let value: Result<usize, ()> = cache.get_or_insert_with(&"k", || {
                calls += 1;
                Ok(42)
            });
            assert_eq!(value, Ok(42));
        }
        assert_eq!(calls, 1);

        let failed: Result<usize, &str> = cache.get_or_insert_with(&"e", || Err("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(!cache.contains(&"e"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 1);
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
