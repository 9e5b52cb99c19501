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

//! Mutable path builder with structural copy-on-write

use std::fmt;
use std::sync::Arc;

use super::intern::Symbol;
use super::path::{PathQuery, XPath};
use super::segment::Segment;
use crate::error::{Result, XPathError};
use crate::schema::{SharedAttributeOrder, default_attribute_order};

/// How [`XPathBuf::merge_attributes`] resolves a key present on both sides
/// with different values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Fail with [`XPathError::DuplicateAttributeConflict`]
    #[default]
    Reject,
    /// Keep the value already on the path
    KeepExisting,
    /// Overwrite with the incoming value
    TakeIncoming,
}

/// A single-owner, mutable path.
///
/// Built by the parser or obtained from [`XPath::thaw`]. Segments stay shared
/// with the frozen origin until written; [`freeze`](XPathBuf::freeze) turns
/// the builder into an [`XPath`] without copying.
#[derive(Clone)]
pub struct XPathBuf {
    pub(crate) segments: Arc<Vec<Arc<Segment>>>,
    pub(crate) order: SharedAttributeOrder,
}

impl Default for XPathBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathBuf {
    /// Empty builder using the LDML attribute ordering
    pub fn new() -> Self {
        Self::with_order(default_attribute_order())
    }

    /// Empty builder with a caller-supplied attribute ordering
    pub fn with_order(order: SharedAttributeOrder) -> Self {
        Self {
            segments: Arc::new(Vec::new()),
            order,
        }
    }

    /// Parse absolute path text into a builder
    pub fn parse(text: &str) -> Result<Self> {
        let mut path = Self::new();
        crate::parser::parse_into(&mut path, text)?;
        Ok(path)
    }

    /// Parse with a caller-supplied attribute ordering
    pub fn parse_with_order(text: &str, order: SharedAttributeOrder) -> Result<Self> {
        let mut path = Self::with_order(order);
        crate::parser::parse_into(&mut path, text)?;
        Ok(path)
    }

    /// Finish building
    pub fn freeze(self) -> XPath {
        XPath {
            segments: self.segments,
            order: self.order,
        }
    }

    /// Always false; present for symmetry with [`XPath`]
    pub fn is_frozen(&self) -> bool {
        false
    }

    /// True when this builder still shares its segment list with `frozen`
    pub fn shares_storage_with(&self, frozen: &XPath) -> bool {
        Arc::ptr_eq(&self.segments, &frozen.segments)
    }

    /// True when segment `index` is still shared with `frozen`'s segment at the same index
    pub fn shares_segment_with(&self, frozen: &XPath, index: usize) -> bool {
        match (self.segments.get(index), frozen.segments.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The attribute ordering new attributes are sorted by
    pub fn attribute_order(&self) -> &SharedAttributeOrder {
        &self.order
    }

    fn segments_mut(&mut self) -> &mut Vec<Arc<Segment>> {
        Arc::make_mut(&mut self.segments)
    }

    /// Append a segment without attributes
    pub fn add_element(&mut self, name: &str) -> &mut Self {
        self.segments_mut().push(Arc::new(Segment::new(Symbol::intern(name))));
        self
    }

    /// Append several segments without attributes
    pub fn add_elements<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for name in names {
            self.add_element(name);
        }
        self
    }

    /// Append an already built segment, re-ranking its attributes for this path's ordering
    pub fn push_segment(&mut self, segment: &Segment) -> &mut Self {
        let segment = segment.renamed(segment.name(), &*self.order);
        self.segments_mut().push(Arc::new(segment));
        self
    }

    /// Set an attribute on the last segment.
    ///
    /// A different value for an attribute that is already present is a
    /// conflict.
    pub fn add_attribute(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        let last = self.segments.last().ok_or(XPathError::index(-1, 0))?;
        match last.attribute(key) {
            Some(existing) if existing != value => {
                return Err(XPathError::conflict(last.name(), key, existing, value));
            }
            _ => {}
        }
        self.set_attribute(-1, key, Some(value))?;
        Ok(self)
    }

    /// Set (`Some`) or remove (`None`) an attribute on segment `index`.
    ///
    /// Copies only the addressed segment, and only when the write changes
    /// it. A no-op write allocates nothing and keeps storage shared. Values
    /// holding both `"` and `'` cannot be written as path text and are
    /// rejected.
    pub fn set_attribute(&mut self, index: isize, key: &str, value: Option<&str>) -> Result<&mut Self> {
        let at = self.resolve_index(index)?;
        if let Some(value) = value {
            if value.contains('"') && value.contains('\'') {
                return Err(XPathError::UnquotableValue {
                    attribute: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if !self.segments[at].would_change(key, value) {
            return Ok(self);
        }
        let order = &*self.order;
        let list = Arc::make_mut(&mut self.segments);
        Arc::make_mut(&mut list[at]).put_attribute(order, key, value);
        Ok(self)
    }

    /// Set an attribute on the first segment named `element`
    pub fn set_attribute_named(&mut self, element: &str, key: &str, value: Option<&str>) -> Result<&mut Self> {
        let at = self
            .find_element(element)
            .ok_or_else(|| XPathError::element_not_found(element))?;
        self.set_attribute(at as isize, key, value)
    }

    /// Remove an attribute from segment `index`
    pub fn remove_attribute(&mut self, index: isize, key: &str) -> Result<&mut Self> {
        self.set_attribute(index, key, None)
    }

    /// Remove an attribute from the first segment named `element`
    pub fn remove_attribute_named(&mut self, element: &str, key: &str) -> Result<&mut Self> {
        self.set_attribute_named(element, key, None)
    }

    /// Remove several attributes from segment `index`
    pub fn remove_attributes<S: AsRef<str>>(&mut self, index: isize, keys: &[S]) -> Result<&mut Self> {
        let at = self.resolve_index(index)?;
        if !keys.iter().any(|k| self.segments[at].attribute(k.as_ref()).is_some()) {
            return Ok(self);
        }
        let list = Arc::make_mut(&mut self.segments);
        Arc::make_mut(&mut list[at]).remove_keys(keys);
        Ok(self)
    }

    /// Remove `key` from every segment that has it
    pub fn remove_attribute_everywhere(&mut self, key: &str) -> &mut Self {
        for at in 0..self.segments.len() {
            if self.segments[at].attribute(key).is_some() {
                let list = Arc::make_mut(&mut self.segments);
                Arc::make_mut(&mut list[at]).remove_keys(&[key]);
            }
        }
        self
    }

    /// Rename segment `index`, keeping its attributes
    pub fn set_element(&mut self, index: isize, name: &str) -> Result<&mut Self> {
        let at = self.resolve_index(index)?;
        if self.segments[at].name() == name {
            return Ok(self);
        }
        let renamed = self.segments[at].renamed(name, &*self.order);
        self.segments_mut()[at] = Arc::new(renamed);
        Ok(self)
    }

    /// Remove segment `index`
    pub fn remove_element(&mut self, index: isize) -> Result<&mut Self> {
        let at = self.resolve_index(index)?;
        self.segments_mut().remove(at);
        Ok(self)
    }

    /// Drop the last segment
    pub fn trim_last(&mut self) -> Result<&mut Self> {
        self.remove_element(-1)
    }

    /// Keep only the first `len` segments
    pub fn truncate(&mut self, len: usize) -> &mut Self {
        if len < self.segments.len() {
            self.segments_mut().truncate(len);
        }
        self
    }

    /// Remove every segment
    pub fn clear(&mut self) -> &mut Self {
        if !self.segments.is_empty() {
            self.segments = Arc::new(Vec::new());
        }
        self
    }

    /// Apply relative path text: `//...` replaces the path, `/...` appends,
    /// and each leading `../` pops one segment first
    pub fn add_relative(&mut self, text: &str) -> Result<&mut Self> {
        crate::parser::parse_relative(self, text)?;
        Ok(self)
    }

    /// Strip a `proposed` marker from every `alt` attribute.
    ///
    /// `alt="proposed-x"` is removed entirely; `alt="short-proposed-x"`
    /// becomes `alt="short"`.
    pub fn remove_proposed(&mut self) -> &mut Self {
        for at in 0..self.segments.len() {
            let Some(alt) = self.segments[at].attribute("alt") else {
                continue;
            };
            let Some(pos) = alt.find("proposed") else {
                continue;
            };
            let kept = alt[..pos].trim_end_matches('-').to_string();
            let value = if kept.is_empty() { None } else { Some(kept.as_str()) };
            let order = &*self.order;
            let list = Arc::make_mut(&mut self.segments);
            Arc::make_mut(&mut list[at]).put_attribute(order, "alt", value);
        }
        self
    }

    /// Copy every attribute of `other` onto segment `index`.
    ///
    /// Under [`MergePolicy::Reject`] every key is checked before anything is
    /// written, so a conflict leaves the path untouched.
    pub fn merge_attributes(&mut self, index: isize, other: &Segment, policy: MergePolicy) -> Result<&mut Self> {
        let at = self.resolve_index(index)?;
        let target = &self.segments[at];
        let mut writes = Vec::with_capacity(other.attribute_count());
        for (key, incoming) in other.attributes() {
            match target.attribute(key) {
                Some(existing) if existing != incoming => match policy {
                    MergePolicy::Reject => {
                        return Err(XPathError::conflict(target.name(), key, existing, incoming));
                    }
                    MergePolicy::KeepExisting => {}
                    MergePolicy::TakeIncoming => writes.push((key, incoming)),
                },
                _ => writes.push((key, incoming)),
            }
        }
        let mut scratch = self.clone();
        for (key, value) in writes {
            scratch.set_attribute(at as isize, key, Some(value))?;
        }
        *self = scratch;
        Ok(self)
    }
}

impl PathQuery for XPathBuf {
    #[inline]
    fn segment_slice(&self) -> &[Arc<Segment>] {
        &self.segments
    }
}

impl From<XPathBuf> for XPath {
    fn from(path: XPathBuf) -> Self {
        path.freeze()
    }
}

impl PartialEq for XPathBuf {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for XPathBuf {}

impl fmt::Display for XPathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for XPathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("XPathBuf").field(&self.to_text()).finish()
    }
}
