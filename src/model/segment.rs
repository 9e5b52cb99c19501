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

//! A single path step: element name plus ordered attributes

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::intern::Symbol;
use crate::schema::AttributeOrder;

/// One attribute of a segment, with the rank it was sorted by
#[derive(Debug, Clone)]
struct Attribute {
    rank: u32,
    key: Symbol,
    value: Arc<str>,
}

/// Attributes of one segment, sorted by `(rank, name)`.
///
/// Never empty: a segment without attributes holds `None` instead.
#[derive(Debug, Clone)]
struct AttributeMap {
    entries: SmallVec<[Attribute; 2]>,
}

impl AttributeMap {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|a| a.key == key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.key == key)
            .map(|a| &*a.value)
    }

    fn insert(&mut self, attribute: Attribute) {
        if let Some(index) = self.position(&attribute.key) {
            self.entries.remove(index);
        }
        let at = self
            .entries
            .iter()
            .position(|a| (a.rank, &a.key) > (attribute.rank, &attribute.key))
            .unwrap_or(self.entries.len());
        self.entries.insert(at, attribute);
    }
}

/// One step of a path.
///
/// Equality and hashing ignore attribute order, so segments built under
/// different attribute orderings still compare by content.
#[derive(Debug, Clone)]
pub struct Segment {
    name: Symbol,
    attributes: Option<AttributeMap>,
}

impl Segment {
    /// Create a segment without attributes
    pub fn new(name: impl Into<Symbol>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
        }
    }

    /// Element name
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Element name as an interned symbol
    #[inline]
    pub fn symbol(&self) -> &Symbol {
        &self.name
    }

    /// Number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.as_ref().map_or(0, |m| m.entries.len())
    }

    /// True when the segment carries at least one attribute
    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    /// Value of one attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.as_ref().and_then(|m| m.get(key))
    }

    /// Attributes in serialization order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .flat_map(|m| m.entries.iter())
            .map(|a| (a.key.as_str(), &*a.value))
    }

    /// Attribute names in serialization order
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes().map(|(k, _)| k)
    }

    /// True when setting `key` to `value` (`None` removes) would change the segment
    pub fn would_change(&self, key: &str, value: Option<&str>) -> bool {
        match (self.attribute(key), value) {
            (None, None) => false,
            (Some(current), Some(new)) => current != new,
            _ => true,
        }
    }

    /// Set or remove one attribute, returning whether anything changed
    pub(crate) fn put_attribute(
        &mut self,
        order: &dyn AttributeOrder,
        key: &str,
        value: Option<&str>,
    ) -> bool {
        if !self.would_change(key, value) {
            return false;
        }
        match value {
            Some(value) => {
                let attribute = Attribute {
                    rank: order.rank(self.name(), key),
                    key: Symbol::intern(key),
                    value: Arc::from(value),
                };
                self.attributes
                    .get_or_insert_with(|| AttributeMap {
                        entries: SmallVec::new(),
                    })
                    .insert(attribute);
            }
            None => self.remove_keys(&[key]),
        }
        true
    }

    /// Remove every listed attribute
    pub(crate) fn remove_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        if let Some(map) = self.attributes.as_mut() {
            map.entries
                .retain(|a| !keys.iter().any(|k| a.key == k.as_ref()));
            if map.entries.is_empty() {
                self.attributes = None;
            }
        }
    }

    /// Same attributes under a different element name, re-ranked for it
    pub(crate) fn renamed(&self, name: &str, order: &dyn AttributeOrder) -> Segment {
        let mut segment = Segment::new(Symbol::intern(name));
        for (key, value) in self.attributes() {
            segment.put_attribute(order, key, Some(value));
        }
        segment
    }

    /// Append the path-text form (`/name[@k="v"]...`) to `out`
    pub fn write_text(&self, out: &mut String) {
        out.push('/');
        out.push_str(self.name());
        for (key, value) in self.attributes() {
            // a value holding the double quote is delimited with apostrophes instead
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push_str("[@");
            out.push_str(key);
            out.push('=');
            out.push(quote);
            out.push_str(value);
            out.push(quote);
            out.push(']');
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name || self.attribute_count() != other.attribute_count() {
            return false;
        }
        self.attributes()
            .all(|(key, value)| other.attribute(key) == Some(value))
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        // order-independent combination so hashing agrees with equality
        let mut combined: u64 = 0;
        for (key, value) in self.attributes() {
            let mut entry = rustc_hash::FxHasher::default();
            key.hash(&mut entry);
            value.hash(&mut entry);
            combined = combined.wrapping_add(entry.finish());
        }
        self.attribute_count().hash(state);
        combined.hash(state);
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    /// Schema-free order: name, then attributes compared as name-sorted pairs
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| {
            let mut mine: SmallVec<[(&str, &str); 4]> = self.attributes().collect();
            let mut theirs: SmallVec<[(&str, &str); 4]> = other.attributes().collect();
            mine.sort_unstable();
            theirs.sort_unstable();
            mine.cmp(&theirs)
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_text(&mut text);
        f.write_str(&text)
    }
}
