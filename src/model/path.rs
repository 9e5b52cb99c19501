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

//! Frozen paths and the read-only path API
//!
//! A path is an ordered list of [`Segment`]s, for example
//! `//ldml/dates/calendars/calendar[@type="gregorian"]`. Two types share the
//! same storage layout:
//!
//! - [`XPath`] is frozen. It can be cloned cheaply and shared across threads,
//!   and exposes no mutators.
//! - [`XPathBuf`](super::XPathBuf) is the single-owner mutable form.
//!
//! Storage is `Arc<Vec<Arc<Segment>>>`. Thawing an `XPath` shares both
//! levels, and the first write to a segment copies the list of pointers plus
//! that one segment; every other segment stays shared with the frozen
//! original.

use indexmap::IndexSet;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::builder::XPathBuf;
use super::segment::Segment;
use crate::error::{Result, XPathError};
use crate::schema::{DistinguishingAttributes, PathComparator, SharedAttributeOrder};

/// Read-only operations shared by frozen and mutable paths.
///
/// Index arguments are signed: negative values address from the end, so
/// `-1` is the last segment.
pub trait PathQuery {
    /// The underlying segment list
    fn segment_slice(&self) -> &[Arc<Segment>];

    /// Number of segments
    fn len(&self) -> usize {
        self.segment_slice().len()
    }

    /// True while no segment has been added
    fn is_empty(&self) -> bool {
        self.segment_slice().is_empty()
    }

    /// Segments from root to leaf
    fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segment_slice().iter().map(|s| &**s)
    }

    /// Turn a signed index into a position
    fn resolve_index(&self, index: isize) -> Result<usize> {
        let len = self.len();
        let resolved = if index < 0 {
            index + len as isize
        } else {
            index
        };
        if resolved < 0 || resolved as usize >= len {
            return Err(XPathError::index(index, len));
        }
        Ok(resolved as usize)
    }

    /// Segment at `index`
    fn segment(&self, index: isize) -> Result<&Segment> {
        let at = self.resolve_index(index)?;
        Ok(&self.segment_slice()[at])
    }

    /// Element name at `index`
    fn element(&self, index: isize) -> Result<&str> {
        Ok(self.segment(index)?.name())
    }

    /// Value of `key` on the segment at `index`
    fn attribute_value(&self, index: isize, key: &str) -> Result<Option<&str>> {
        Ok(self.segment(index)?.attribute(key))
    }

    /// Number of attributes on the segment at `index`
    fn attribute_count(&self, index: isize) -> Result<usize> {
        Ok(self.segment(index)?.attribute_count())
    }

    /// Attribute names of the segment at `index`, in serialization order
    fn attribute_keys(&self, index: isize) -> Result<Vec<&str>> {
        Ok(self.segment(index)?.attribute_keys().collect())
    }

    /// Attributes of the segment at `index`, in serialization order
    fn attributes(&self, index: isize) -> Result<Vec<(&str, &str)>> {
        Ok(self.segment(index)?.attributes().collect())
    }

    /// Position of the first segment named `name`
    fn find_element(&self, name: &str) -> Option<usize> {
        self.segments().position(|s| s.name() == name)
    }

    /// Alias of [`find_element`](PathQuery::find_element)
    fn find_first(&self, name: &str) -> Option<usize> {
        self.find_element(name)
    }

    /// True when some segment is named `name`
    fn contains(&self, name: &str) -> bool {
        self.find_element(name).is_some()
    }

    /// Attributes of the first segment named `element`
    fn find_attributes(&self, element: &str) -> Option<Vec<(&str, &str)>> {
        let at = self.find_element(element)?;
        Some(self.segment_slice()[at].attributes().collect())
    }

    /// Value of `attribute` on the first segment named `element`
    fn find_attribute_value(&self, element: &str, attribute: &str) -> Option<&str> {
        let at = self.find_element(element)?;
        self.segment_slice()[at].attribute(attribute)
    }

    /// Value of `attribute` on the first segment that has it
    fn find_first_attribute_value(&self, attribute: &str) -> Option<&str> {
        self.segments().find_map(|s| s.attribute(attribute))
    }

    /// True when any segment carries `attribute`
    fn contains_attribute(&self, attribute: &str) -> bool {
        self.find_first_attribute_value(attribute).is_some()
    }

    /// True when any segment carries `attribute="value"`
    fn contains_attribute_value(&self, attribute: &str, value: &str) -> bool {
        self.segments().any(|s| s.attribute(attribute) == Some(value))
    }

    /// Distinct element names in path order
    fn element_names(&self) -> IndexSet<&str> {
        self.segments().map(|s| s.name()).collect()
    }

    /// Index of the first segment that differs from `other`
    fn first_difference(&self, other: &impl PathQuery) -> usize {
        let mine = self.segment_slice();
        let theirs = other.segment_slice();
        mine.iter()
            .zip(theirs.iter())
            .position(|(a, b)| !Arc::ptr_eq(a, b) && a != b)
            .unwrap_or(mine.len().min(theirs.len()))
    }

    /// True when the paths differ only in the attributes of their common last
    /// segment, with equal `type` (or `id` when neither has a type)
    fn is_like(&self, other: &impl PathQuery) -> bool {
        let mine = self.segment_slice();
        let theirs = other.segment_slice();
        let min = mine.len().min(theirs.len());
        for i in 0..min {
            let (a, b) = (&mine[i], &theirs[i]);
            if a == b {
                continue;
            }
            if i != min - 1 {
                return false;
            }
            let (mut ta, mut tb) = (a.attribute("type"), b.attribute("type"));
            if ta.is_none() && tb.is_none() {
                ta = a.attribute("id");
                tb = b.attribute("id");
            }
            return matches!((ta, tb), (Some(x), Some(y)) if x == y);
        }
        false
    }

    /// Canonical path text of the whole path
    fn to_text(&self) -> String {
        render_range(self.segment_slice(), 0, self.len(), true)
    }

    /// Path text of the first `limit` segments (negative counts from the end)
    fn to_text_limit(&self, limit: isize) -> Result<String> {
        let limit = self.resolve_bound(limit)?;
        Ok(render_range(self.segment_slice(), 0, limit, true))
    }

    /// Path text of segments `start..limit` without the leading root slash
    fn to_text_range(&self, start: isize, limit: isize) -> Result<String> {
        let start = self.resolve_bound(start)?;
        let limit = self.resolve_bound(limit)?;
        if start > limit {
            return Err(XPathError::index(start as isize, self.len()));
        }
        Ok(render_range(self.segment_slice(), start, limit, false))
    }

    /// Turn a signed bound (`0..=len`) into a position
    fn resolve_bound(&self, bound: isize) -> Result<usize> {
        let len = self.len();
        let resolved = if bound < 0 { bound + len as isize } else { bound };
        if resolved < 0 || resolved as usize > len {
            return Err(XPathError::index(bound, len));
        }
        Ok(resolved as usize)
    }

    /// Non-distinguishing attributes other than `alt` and `draft`, or `None`
    fn special_nondistinguishing_attributes(
        &self,
        oracle: &dyn DistinguishingAttributes,
    ) -> Option<BTreeMap<String, String>> {
        let mut found: Option<BTreeMap<String, String>> = None;
        for segment in self.segments() {
            for (key, value) in segment.attributes() {
                if key == "alt" || key == "draft" || oracle.is_distinguishing(segment.name(), key)
                {
                    continue;
                }
                found
                    .get_or_insert_with(BTreeMap::new)
                    .insert(key.to_string(), value.to_string());
            }
        }
        found
    }
}

fn render_range(segments: &[Arc<Segment>], start: usize, limit: usize, rooted: bool) -> String {
    let mut out = String::with_capacity(16 * (limit - start) + 1);
    if rooted {
        out.push('/');
    }
    for segment in &segments[start..limit] {
        segment.write_text(&mut out);
    }
    out
}

/// A frozen path: immutable, cheap to clone, safe to share
#[derive(Clone)]
pub struct XPath {
    pub(crate) segments: Arc<Vec<Arc<Segment>>>,
    pub(crate) order: SharedAttributeOrder,
}

impl XPath {
    /// Parse absolute path text (`//a/b[@k="v"]`) into a frozen path
    pub fn parse(text: &str) -> Result<XPath> {
        crate::parser::parse(text)
    }

    /// Canonical frozen instance for `text` from the process-wide cache
    pub fn frozen_instance(text: &str) -> Result<XPath> {
        crate::cache::global_path_cache().get_or_parse(text)
    }

    /// Freezing a frozen path is the identity
    pub fn freeze(self) -> XPath {
        self
    }

    /// Always true; present for symmetry with [`XPathBuf`]
    pub fn is_frozen(&self) -> bool {
        true
    }

    /// A mutable copy that shares every segment until it is written
    pub fn thaw(&self) -> XPathBuf {
        XPathBuf {
            segments: Arc::clone(&self.segments),
            order: Arc::clone(&self.order),
        }
    }

    /// Reclaim this path for in-place mutation.
    ///
    /// Succeeds only when no other holder shares the segment list; a frozen
    /// path that other readers can see must be thawed instead.
    pub fn into_exclusive(self) -> Result<XPathBuf> {
        if Arc::strong_count(&self.segments) != 1 {
            return Err(XPathError::ImmutableState {
                operation: "mutate in place",
            });
        }
        Ok(XPathBuf {
            segments: self.segments,
            order: self.order,
        })
    }

    /// The attribute ordering this path was built with
    pub fn attribute_order(&self) -> &SharedAttributeOrder {
        &self.order
    }

    /// Order two paths with a schema comparator
    pub fn compare_with(&self, other: &XPath, comparator: &dyn PathComparator) -> Ordering {
        comparator.compare(self, other)
    }

    /// True when this path and `other` share one segment list
    pub fn shares_storage_with(&self, other: &XPath) -> bool {
        Arc::ptr_eq(&self.segments, &other.segments)
    }
}

impl PathQuery for XPath {
    #[inline]
    fn segment_slice(&self) -> &[Arc<Segment>] {
        &self.segments
    }
}

impl PartialEq for XPath {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.segments, &other.segments) || self.segments == other.segments
    }
}

impl Eq for XPath {}

impl Hash for XPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.len().hash(state);
        for segment in self.segments.iter() {
            segment.hash(state);
        }
    }
}

impl PartialOrd for XPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments().cmp(other.segments())
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("XPath").field(&self.to_text()).finish()
    }
}

impl std::str::FromStr for XPath {
    type Err = XPathError;

    fn from_str(text: &str) -> Result<Self> {
        XPath::parse(text)
    }
}

/// `text` with every `alt` attribute removed
pub fn path_without_alt(text: &str) -> Result<String> {
    let mut path = XPath::frozen_instance(text)?.thaw();
    path.remove_attribute_everywhere("alt");
    Ok(path.to_text())
}
