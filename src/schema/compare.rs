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

//! Schema-driven path ordering

use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use super::{AttributeOrder, LdmlAttributeOrder, PathComparator, UNRANKED};
use crate::model::{PathQuery, Segment, XPath};

/// Orders paths segment by segment.
///
/// Each segment pair is compared by element rank (names without a rank
/// follow ranked names and compare lexically), then attribute by attribute
/// in schema order: ranked attribute names first, then values. A path that is
/// a strict prefix of another sorts first.
#[derive(Debug, Clone)]
pub struct SchemaPathComparator {
    elements: FxHashMap<String, u32>,
    attributes: LdmlAttributeOrder,
}

impl Default for SchemaPathComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaPathComparator {
    /// Comparator without an element ranking: element names compare lexically
    pub fn new() -> Self {
        Self {
            elements: FxHashMap::default(),
            attributes: LdmlAttributeOrder::new(),
        }
    }

    /// Rank elements by their position in `names`
    pub fn with_element_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = names
            .into_iter()
            .enumerate()
            .map(|(rank, name)| (name.into(), rank as u32))
            .collect();
        self
    }

    fn element_rank(&self, name: &str) -> u32 {
        self.elements.get(name).copied().unwrap_or(UNRANKED)
    }

    fn compare_segments(&self, a: &Segment, b: &Segment) -> Ordering {
        let by_name = self
            .element_rank(a.name())
            .cmp(&self.element_rank(b.name()))
            .then_with(|| a.name().cmp(b.name()));
        if by_name != Ordering::Equal {
            return by_name;
        }

        let element = a.name();
        let mut left = a.attributes();
        let mut right = b.attributes();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some((ka, va)), Some((kb, vb))) => {
                    let ordering = self
                        .attributes
                        .rank(element, ka)
                        .cmp(&self.attributes.rank(element, kb))
                        .then_with(|| ka.cmp(kb))
                        .then_with(|| compare_values(va, vb));
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
        }
    }
}

/// Integers compare numerically so `type="10"` follows `type="9"`
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

impl PathComparator for SchemaPathComparator {
    fn compare(&self, a: &XPath, b: &XPath) -> Ordering {
        for (x, y) in a.segments().zip(b.segments()) {
            let ordering = self.compare_segments(x, y);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.len().cmp(&b.len())
    }
}
