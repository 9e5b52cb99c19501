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

//! Schema collaborators consumed by the path model
//!
//! The path core never reads a DTD itself. Attribute ordering, identity
//! (distinguishing) attributes, path ordering and default-value suppression
//! are supplied through the traits in this module. LDML defaults are
//! provided in [`ldml`].

pub mod compare;
pub mod ldml;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use compare::SchemaPathComparator;
pub use ldml::{LdmlAttributeOrder, LdmlDistinguishing, SuppressionTable};

use crate::error::Result;
use crate::model::{PathQuery, XPath, XPathBuf};

/// Rank given to attributes the ordering does not know about
pub const UNRANKED: u32 = u32::MAX;

/// Total order over the attribute names of an element.
///
/// Attributes are sorted by `(rank, name)`, so implementations only need to
/// rank the names they know and return [`UNRANKED`] for the rest.
pub trait AttributeOrder: Send + Sync + fmt::Debug {
    /// Rank of `attribute` on `element`; lower ranks serialize first
    fn rank(&self, element: &str, attribute: &str) -> u32;
}

/// Shared handle to an attribute ordering, carried by every path
pub type SharedAttributeOrder = Arc<dyn AttributeOrder>;

/// Reports whether an attribute takes part in a path's identity
pub trait DistinguishingAttributes: Send + Sync {
    /// True when `attribute` on `element` distinguishes one item from another
    fn is_distinguishing(&self, element: &str, attribute: &str) -> bool;
}

/// Total order over paths, consistent with path equality
pub trait PathComparator: Send + Sync {
    /// Compare two paths
    fn compare(&self, a: &XPath, b: &XPath) -> std::cmp::Ordering;
}

/// The process-wide LDML attribute ordering
pub fn default_attribute_order() -> SharedAttributeOrder {
    Arc::clone(&DEFAULT_ORDER)
}

static DEFAULT_ORDER: once_cell::sync::Lazy<SharedAttributeOrder> =
    once_cell::sync::Lazy::new(|| Arc::new(LdmlAttributeOrder::new()) as SharedAttributeOrder);

static DEFAULT_DISTINGUISHING: once_cell::sync::Lazy<LdmlDistinguishing> =
    once_cell::sync::Lazy::new(LdmlDistinguishing::new);

static DEFAULT_COMPARATOR: once_cell::sync::Lazy<SchemaPathComparator> =
    once_cell::sync::Lazy::new(SchemaPathComparator::new);

static DEFAULT_SUPPRESSION: once_cell::sync::Lazy<SuppressionTable> =
    once_cell::sync::Lazy::new(SuppressionTable::ldml);

/// Bundle of schema collaborators passed by reference through the core
#[derive(Clone, Copy)]
pub struct SchemaContext<'a> {
    /// Attribute ordering used when building paths
    pub order: &'a SharedAttributeOrder,
    /// Identity attribute oracle
    pub distinguishing: &'a dyn DistinguishingAttributes,
    /// Path ordering
    pub comparator: &'a dyn PathComparator,
    /// Attributes omitted from XML rendering
    pub suppression: &'a SuppressionTable,
}

impl SchemaContext<'static> {
    /// LDML defaults for every collaborator
    pub fn ldml() -> Self {
        Self {
            order: &DEFAULT_ORDER,
            distinguishing: &*DEFAULT_DISTINGUISHING,
            comparator: &*DEFAULT_COMPARATOR,
            suppression: &DEFAULT_SUPPRESSION,
        }
    }
}

impl SchemaContext<'_> {
    /// Parse `text`, sorting attributes by this context's ordering
    pub fn parse(&self, text: &str) -> Result<XPath> {
        Ok(XPathBuf::parse_with_order(text, Arc::clone(self.order))?.freeze())
    }

    /// Order two paths with this context's comparator
    pub fn compare(&self, a: &XPath, b: &XPath) -> Ordering {
        a.compare_with(b, self.comparator)
    }

    /// Non-distinguishing attributes of `path` other than `alt` and `draft`
    pub fn special_nondistinguishing_attributes(
        &self,
        path: &impl PathQuery,
    ) -> Option<BTreeMap<String, String>> {
        path.special_nondistinguishing_attributes(self.distinguishing)
    }
}

impl fmt::Debug for SchemaContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaContext")
            .field("order", self.order)
            .field("suppression", self.suppression)
            .finish_non_exhaustive()
    }
}
