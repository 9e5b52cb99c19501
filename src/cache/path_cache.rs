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

//! Shared path-text → frozen path cache
//!
//! Read-through memoization of the parser. Parsing is a pure function of the
//! input text, so two threads racing on the same unseen key both parse and
//! the first insert wins; the loser's result is dropped and the cached
//! instance is returned to both.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::PathCacheConfig;
use crate::error::Result;
use crate::model::XPath;

/// Statistics about path cache performance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries currently cached
    pub entries: usize,
    /// Number of entries evicted
    pub evictions: u64,
}

impl PathCacheStats {
    /// Cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64) / ((self.hits + self.misses) as f64) * 100.0
        }
    }
}

/// Cache entry with access metadata
#[derive(Debug)]
struct CacheEntry {
    path: XPath,
    last_accessed: Instant,
    access_count: u64,
}

impl CacheEntry {
    fn new(path: XPath) -> Self {
        Self {
            path,
            last_accessed: Instant::now(),
            access_count: 1,
        }
    }

    fn access(&mut self) -> XPath {
        self.last_accessed = Instant::now();
        self.access_count += 1;
        self.path.clone()
    }
}

/// Thread-safe memo cache of parsed, frozen paths
pub struct PathCache {
    cache: DashMap<String, CacheEntry>,
    config: PathCacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl PathCache {
    /// Cache with the default configuration
    pub fn new() -> Self {
        Self::with_config(PathCacheConfig::default())
    }

    /// Cache with a custom configuration
    pub fn with_config(config: PathCacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &PathCacheConfig {
        &self.config
    }

    fn stores_entries(&self) -> bool {
        self.config.enabled && self.config.max_entries != Some(0)
    }

    /// Cached frozen path for `text`, if present
    pub fn get(&self, text: &str) -> Option<XPath> {
        if !self.stores_entries() {
            return None;
        }
        match self.cache.get_mut(text) {
            Some(mut entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.access())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Canonical frozen path for `text`, parsing it on a miss.
    ///
    /// No lock is held while parsing.
    pub fn get_or_parse(&self, text: &str) -> Result<XPath> {
        if let Some(path) = self.get(text) {
            return Ok(path);
        }
        let parsed = XPath::parse(text)?;
        if !self.stores_entries() {
            return Ok(parsed);
        }
        log::debug!("path cache miss: {text}");
        Ok(self.insert(text, parsed))
    }

    /// Store `path` under `text` unless another thread already did; returns
    /// the cached instance
    pub fn insert(&self, text: &str, path: XPath) -> XPath {
        if !self.stores_entries() {
            return path;
        }
        if let Some(max) = self.config.max_entries {
            if self.cache.len() >= max {
                self.evict_lru_entries(max);
            }
        }
        self.cache
            .entry(text.to_string())
            .or_insert_with(|| CacheEntry::new(path))
            .path
            .clone()
    }

    /// Get cache statistics
    pub fn stats(&self) -> PathCacheStats {
        PathCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Number of cached paths
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// How often `text` has been served, counting the insert
    pub fn access_count(&self, text: &str) -> Option<u64> {
        self.cache.get(text).map(|entry| entry.access_count)
    }

    /// Evict the least recently used share of entries
    fn evict_lru_entries(&self, max_entries: usize) {
        let mut entries: Vec<(String, Instant)> = self
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().last_accessed))
            .collect();

        // oldest first
        entries.sort_by_key(|(_, last_accessed)| *last_accessed);

        let remove_count = self.config.eviction_batch(max_entries);
        for (key, _) in entries.into_iter().take(remove_count) {
            if self.cache.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        log::debug!("path cache evicted up to {remove_count} entries");
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Global shared path cache instance
static GLOBAL_PATH_CACHE: once_cell::sync::Lazy<PathCache> =
    once_cell::sync::Lazy::new(PathCache::new);

/// Get a reference to the global path cache
pub fn global_path_cache() -> &'static PathCache {
    &GLOBAL_PATH_CACHE
}

/// Get statistics from the global path cache
pub fn global_path_cache_stats() -> PathCacheStats {
    global_path_cache().stats()
}
