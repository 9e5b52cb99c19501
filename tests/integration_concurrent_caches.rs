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

//! Caches shared between worker threads

use ldml_xpath::*;
use std::sync::Arc;
use std::thread;

mod utils;
use utils::{SAMPLE_ITEMS, init_logging, locale_data};

const THREADS: usize = 8;

#[test]
fn test_path_cache_races_produce_equal_paths() {
    let cache = Arc::new(PathCache::with_config(PathCacheConfig::batch()));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                SAMPLE_ITEMS
                    .iter()
                    .map(|(text, _)| cache.get_or_parse(text).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<XPath>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for paths in &results[1..] {
        assert_eq!(paths, &results[0]);
    }
    assert_eq!(cache.len(), SAMPLE_ITEMS.len());

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, (THREADS * SAMPLE_ITEMS.len()) as u64);
    assert!(stats.misses >= SAMPLE_ITEMS.len() as u64);
}

#[test]
fn test_grouping_engine_across_locales() {
    init_logging();
    let engine = Arc::new(GroupingEngine::with_config(&EngineConfig::batch()).unwrap());
    let data = Arc::new(locale_data());
    let meter = SAMPLE_ITEMS[6].0;

    let handles: Vec<_> = ["en", "de", "ja", "en", "de", "ja"]
        .into_iter()
        .map(|locale| {
            let engine = Arc::clone(&engine);
            let data = Arc::clone(&data);
            thread::spawn(move || {
                let ctx = LocaleContext::new(locale, &*data);
                (locale, engine.expand(&ctx, meter).unwrap().len())
            })
        })
        .collect();

    for handle in handles {
        let (locale, size) = handle.join().unwrap();
        let expected = match locale {
            "en" => 2,
            "de" => 8,
            _ => 1,
        };
        assert_eq!(size, expected, "group size for {locale}");
    }
    assert_eq!(engine.locale_group_stats().entries, 3);
}

#[test]
fn test_bounded_path_cache_under_load() {
    let cache = Arc::new(PathCache::with_config(PathCacheConfig::bounded(16)));

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..64 {
                    let text = format!(r#"//ldml/worker[@type="{worker}"]/item[@type="{i}"]"#);
                    let path = cache.get_or_parse(&text).unwrap();
                    assert_eq!(path.to_text(), text);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert!(cache.len() <= 16 + THREADS);
    assert!(cache.stats().evictions > 0);
}
