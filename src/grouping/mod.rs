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

//! Logical grouping of paths
//!
//! A logical group is the set of paths that must be edited together: the
//! seven weekday names, the plural forms of a unit pattern, and so on. The
//! engine classifies a path by shape, expands it with the matching rule and
//! caches the result. Groups are closed: expanding any member yields the
//! same group.

pub mod locale;
pub mod optional;
pub mod path_type;
pub mod strategies;

pub use locale::{
    DayPeriodOracle, GrammarOracle, GrammaticalFeature, LocaleContext, PluralOracle,
    StaticLocaleData,
};
pub use path_type::PathType;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cache::{CacheStats, GroupCache, PathCache, PathCacheStats};
use crate::config::EngineConfig;
use crate::error::{Result, XPathError};
use crate::model::{PathQuery, XPath};

/// Uniquely sorted path strings of one group
pub type LogicalGroup = BTreeSet<String>;

/// Classifies paths and expands them into cached logical groups.
///
/// Locale-independent groups are cached by path text; groups that read
/// plural, day-period or grammar data are cached by locale and path text.
pub struct GroupingEngine {
    paths: Arc<PathCache>,
    by_path: GroupCache<String, LogicalGroup>,
    by_locale: GroupCache<(String, String), LogicalGroup>,
}

impl GroupingEngine {
    /// Engine with default configuration
    pub fn new() -> Self {
        Self::build(&EngineConfig::default())
    }

    /// Engine with validated configuration
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &EngineConfig) -> Self {
        Self {
            paths: Arc::new(PathCache::with_config(config.path_cache.clone())),
            by_path: GroupCache::new(config.grouping.capacity),
            by_locale: GroupCache::new(config.grouping.capacity),
        }
    }

    /// Parse paths through a shared cache instead of a private one
    pub fn with_path_cache(mut self, paths: Arc<PathCache>) -> Self {
        self.paths = paths;
        self
    }

    /// Shape of the path text
    pub fn classify(&self, path: &str) -> Result<PathType> {
        Ok(PathType::classify(&self.paths.get_or_parse(path)?))
    }

    /// The logical group containing `path`
    pub fn expand(&self, ctx: &LocaleContext<'_>, path: &str) -> Result<LogicalGroup> {
        let parsed = self.paths.get_or_parse(path)?;
        let path_type = PathType::classify(&parsed);
        if path_type == PathType::Singleton {
            return Ok(strategies::singleton(&parsed));
        }
        let compute = || -> Result<LogicalGroup> {
            log::debug!("expanding {path} as {path_type}");
            let expanded = match strategies::expand(path_type, ctx, &parsed) {
                Err(XPathError::UnsupportedShape { .. }) => None,
                other => other?,
            };
            Ok(closed(&parsed, path_type, expanded))
        };
        if path_type.is_locale_dependent() {
            let key = (ctx.locale.to_string(), path.to_string());
            self.by_locale.get_or_insert_with(&key, compute)
        } else {
            self.by_path.get_or_insert_with(&path.to_string(), compute)
        }
    }

    /// Expand `path` with the rule for `path_type` regardless of its shape.
    ///
    /// Fails with `UnsupportedShape` when the path lacks the element the rule
    /// rewrites. Forced expansions are not cached.
    pub fn expand_as(
        &self,
        ctx: &LocaleContext<'_>,
        path: &str,
        path_type: PathType,
    ) -> Result<LogicalGroup> {
        let parsed = self.paths.get_or_parse(path)?;
        let expanded = strategies::expand(path_type, ctx, &parsed)?;
        Ok(closed(&parsed, path_type, expanded))
    }

    /// True when `path` may be missing while the rest of its group is present
    pub fn is_optional_in_group(
        &self,
        ctx: &LocaleContext<'_>,
        path: &str,
        is_present: impl Fn(&str) -> bool,
    ) -> Result<bool> {
        let parsed = self.paths.get_or_parse(path)?;
        optional::is_optional(ctx, &parsed, &is_present)
    }

    /// Statistics of the path-keyed group cache
    pub fn path_group_stats(&self) -> CacheStats {
        self.by_path.stats()
    }

    /// Statistics of the (locale, path)-keyed group cache
    pub fn locale_group_stats(&self) -> CacheStats {
        self.by_locale.stats()
    }

    /// Statistics of the parse cache
    pub fn path_cache_stats(&self) -> PathCacheStats {
        self.paths.stats()
    }

    /// Drop every cached group; the parse cache is left alone
    pub fn clear_caches(&self) {
        self.by_path.clear();
        self.by_locale.clear();
    }
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `expanded` when it contains `path`, otherwise `{path}`
fn closed(path: &XPath, path_type: PathType, expanded: Option<LogicalGroup>) -> LogicalGroup {
    let text = path.to_text();
    match expanded {
        Some(group) if group.contains(&text) => group,
        _ => {
            log::warn!("{text} does not fit the {path_type} shape, grouping it alone");
            strategies::singleton(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupingCacheConfig;
    use pretty_assertions::assert_eq;

    const WEEKDAY: &str = r#"//ldml/dates/calendars/calendar[@type="gregorian"]/days/dayContext[@type="format"]/dayWidth[@type="wide"]/day[@type="mon"]"#;
    const UNIT: &str =
        r#"//ldml/units/unitLength[@type="short"]/unit[@type="length-meter"]/unitPattern[@count="one"]"#;

    fn data() -> StaticLocaleData {
        StaticLocaleData::new()
            .with_plurals("en", &["one", "other"])
            .with_plurals("ru", &["one", "few", "many", "other"])
    }

    #[test]
    fn test_singleton_is_not_cached() {
        let engine = GroupingEngine::new();
        let data = data();
        let ctx = LocaleContext::new("en", &data);
        let group = engine.expand(&ctx, "//ldml/identity/version").unwrap();
        assert_eq!(group, LogicalGroup::from(["//ldml/identity/version".to_string()]));
        assert_eq!(engine.path_group_stats().entries, 0);
        assert_eq!(engine.locale_group_stats().entries, 0);
    }

    #[test]
    fn test_locale_independent_groups_share_entries() {
        let engine = GroupingEngine::new();
        let data = data();
        let en = engine.expand(&LocaleContext::new("en", &data), WEEKDAY).unwrap();
        let ru = engine.expand(&LocaleContext::new("ru", &data), WEEKDAY).unwrap();
        assert_eq!(en, ru);
        assert_eq!(en.len(), 7);
        let stats = engine.path_group_stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn test_locale_dependent_groups_are_keyed_by_locale() {
        let engine = GroupingEngine::new();
        let data = data();
        let en = engine.expand(&LocaleContext::new("en", &data), UNIT).unwrap();
        let ru = engine.expand(&LocaleContext::new("ru", &data), UNIT).unwrap();
        assert_eq!(en.len(), 2);
        assert_eq!(ru.len(), 4);
        assert_eq!(engine.locale_group_stats().entries, 2);

        engine.clear_caches();
        assert_eq!(engine.locale_group_stats(), CacheStats::default());
    }

    #[test]
    fn test_sanity_failure_groups_alone() {
        let engine = GroupingEngine::new();
        let data = data();
        let ctx = LocaleContext::new("en", &data);
        let explicit = UNIT.replace(r#"@count="one""#, r#"@count="0""#);
        let group = engine.expand(&ctx, &explicit).unwrap();
        assert_eq!(group, LogicalGroup::from([explicit.clone()]));
    }

    #[test]
    fn test_expand_as_requires_anchor() {
        let engine = GroupingEngine::new();
        let data = data();
        let ctx = LocaleContext::new("en", &data);
        let forced = engine.expand_as(&ctx, UNIT, PathType::Days);
        assert!(matches!(forced, Err(XPathError::UnsupportedShape { .. })));

        let as_count = engine.expand_as(&ctx, WEEKDAY, PathType::Singleton).unwrap();
        assert_eq!(as_count.len(), 1);
    }

    #[test]
    fn test_bounded_group_cache() {
        let config = EngineConfig {
            grouping: GroupingCacheConfig::bounded(1),
            ..EngineConfig::default()
        };
        let engine = GroupingEngine::with_config(&config).unwrap();
        let data = data();
        let ctx = LocaleContext::new("en", &data);
        engine.expand(&ctx, WEEKDAY).unwrap();
        engine
            .expand(&ctx, &WEEKDAY.replace(r#""mon""#, r#""tue""#))
            .unwrap();
        assert_eq!(engine.path_group_stats().entries, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            grouping: GroupingCacheConfig { capacity: Some(0) },
            ..EngineConfig::default()
        };
        assert!(matches!(
            GroupingEngine::with_config(&config),
            Err(XPathError::InvalidConfig { .. })
        ));
    }
}
