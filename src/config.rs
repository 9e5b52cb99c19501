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

//! Cache configuration options

use serde::{Deserialize, Serialize};

use crate::error::{Result, XPathError};

/// Configuration for the path-text → frozen path cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathCacheConfig {
    /// Whether lookups are memoized at all
    pub enabled: bool,

    /// Maximum number of cached paths (`None` = unbounded)
    pub max_entries: Option<usize>,

    /// Share of `max_entries` evicted, least recently used first, when full
    pub eviction_fraction: f64,
}

impl Default for PathCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: Some(100_000),
            eviction_fraction: 0.2,
        }
    }
}

impl PathCacheConfig {
    /// Unbounded cache for batch tools that walk whole data sets
    pub fn batch() -> Self {
        Self {
            enabled: true,
            max_entries: None,
            eviction_fraction: 0.2,
        }
    }

    /// Bounded cache
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::default()
        }
    }

    /// No caching: every lookup parses
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_entries: Some(0),
            eviction_fraction: 0.2,
        }
    }

    /// Number of entries removed by one eviction pass, at least one
    pub(crate) fn eviction_batch(&self, max_entries: usize) -> usize {
        ((max_entries as f64 * self.eviction_fraction) as usize).max(1)
    }

    fn validate(&self) -> Result<()> {
        if !(self.eviction_fraction > 0.0 && self.eviction_fraction <= 1.0) {
            return Err(XPathError::InvalidConfig {
                message: format!(
                    "eviction_fraction must be in (0, 1], got {}",
                    self.eviction_fraction
                ),
            });
        }
        Ok(())
    }
}

/// Configuration for the logical-group caches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingCacheConfig {
    /// Entries per cache (`None` = unbounded)
    pub capacity: Option<usize>,
}

impl GroupingCacheConfig {
    /// Unbounded caches
    pub fn batch() -> Self {
        Self { capacity: None }
    }

    /// LRU caches holding at most `capacity` groups each
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(XPathError::InvalidConfig {
                message: "grouping capacity must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for every cache in the crate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path-text cache
    pub path_cache: PathCacheConfig,
    /// Logical-group caches
    pub grouping: GroupingCacheConfig,
}

impl EngineConfig {
    /// Unbounded caches for long batch runs
    pub fn batch() -> Self {
        Self {
            path_cache: PathCacheConfig::batch(),
            grouping: GroupingCacheConfig::batch(),
        }
    }

    /// Bounded caches of `entries` each
    pub fn bounded(entries: usize) -> Self {
        Self {
            path_cache: PathCacheConfig::bounded(entries),
            grouping: GroupingCacheConfig::bounded(entries.max(1)),
        }
    }

    /// Path caching off, smallest grouping caches
    pub fn disabled() -> Self {
        Self {
            path_cache: PathCacheConfig::disabled(),
            grouping: GroupingCacheConfig::bounded(1),
        }
    }

    /// Load from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| XPathError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| XPathError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.path_cache.validate()?;
        self.grouping.validate()
    }
}
