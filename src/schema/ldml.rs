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

//! LDML defaults for the schema collaborators

use rustc_hash::{FxHashMap, FxHashSet};

use super::{AttributeOrder, DistinguishingAttributes, UNRANKED};

/// LDML attribute priority, first serialized first
const LDML_ATTRIBUTE_ORDER: &[&str] = &[
    "_q", "type", "id", "choice", "key", "registry", "source", "target", "path", "day", "date",
    "version", "count", "gender", "case", "lines", "characters", "iso4217", "before", "from",
    "to", "mzone", "number", "time", "casing", "list", "uri", "digits", "rounding", "iso3166",
    "hex", "request", "direction", "alternate", "backwards", "caseFirst", "caseLevel",
    "hiraganaQuarternary", "hiraganaQuaternary", "variableTop", "normalization", "numeric",
    "strength", "elements", "element", "attributes", "attribute", "aliases", "attributeValue",
    "contains", "multizone", "order", "other", "replacement", "scripts", "services",
    "territories", "territory", "tzidVersion", "value", "values", "variant", "variants",
    "visibility", "alpha3", "code", "end", "exclude", "fips10", "gdp", "internet",
    "literacyPercent", "locales", "officialStatus", "population", "populationPercent", "start",
    "used", "writingPercent", "yeartype", "validSubLocales", "standard", "references", "alt",
    "draft",
];

/// Attributes that never change which item a path addresses
const LDML_NON_DISTINGUISHING: &[&str] = &[
    "draft",
    "references",
    "standard",
    "validSubLocales",
    "cldrVersion",
    "version",
    "number",
    "_q",
];

/// Attribute ordering driven by the LDML priority list.
///
/// The same ranks apply to every element; names missing from the list sort
/// after all listed names.
#[derive(Debug, Clone)]
pub struct LdmlAttributeOrder {
    ranks: FxHashMap<&'static str, u32>,
}

impl Default for LdmlAttributeOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl LdmlAttributeOrder {
    /// Build the ordering from the LDML priority list
    pub fn new() -> Self {
        let ranks = LDML_ATTRIBUTE_ORDER
            .iter()
            .enumerate()
            .map(|(rank, name)| (*name, rank as u32))
            .collect();
        Self { ranks }
    }
}

impl AttributeOrder for LdmlAttributeOrder {
    fn rank(&self, _element: &str, attribute: &str) -> u32 {
        self.ranks.get(attribute).copied().unwrap_or(UNRANKED)
    }
}

/// Identity oracle with the LDML non-distinguishing attribute set
#[derive(Debug, Clone)]
pub struct LdmlDistinguishing {
    non_distinguishing: FxHashSet<&'static str>,
}

impl Default for LdmlDistinguishing {
    fn default() -> Self {
        Self::new()
    }
}

impl LdmlDistinguishing {
    /// Create the oracle
    pub fn new() -> Self {
        Self {
            non_distinguishing: LDML_NON_DISTINGUISHING.iter().copied().collect(),
        }
    }
}

impl DistinguishingAttributes for LdmlDistinguishing {
    fn is_distinguishing(&self, _element: &str, attribute: &str) -> bool {
        !self.non_distinguishing.contains(attribute)
    }
}

/// Wildcard for elements, attributes and values in a [`SuppressionTable`]
pub const WILDCARD: &str = "*";

/// Default values omitted from XML rendering: element → attribute → value.
///
/// `*` stands for any element, any attribute, or any value. Path-text
/// rendering never consults this table.
#[derive(Debug, Clone, Default)]
pub struct SuppressionTable {
    entries: FxHashMap<String, FxHashMap<String, String>>,
}

impl SuppressionTable {
    /// An empty table: nothing is suppressed
    pub fn new() -> Self {
        Self::default()
    }

    /// The LDML default-value table
    pub fn ldml() -> Self {
        let mut table = Self::new();
        for (element, attribute, value) in [
            ("version", "cldrVersion", WILDCARD),
            ("orientation", "characters", "left-to-right"),
            ("orientation", "lines", "top-to-bottom"),
            ("weekendStart", "time", "00:00"),
            ("weekendEnd", "time", "24:00"),
            ("dateFormat", "type", "standard"),
            ("timeFormat", "type", "standard"),
            ("dateTimeFormat", "type", "standard"),
            ("decimalFormat", "type", "standard"),
            ("scientificFormat", "type", "standard"),
            ("percentFormat", "type", "standard"),
            ("pattern", "type", "standard"),
            ("currency", "type", "standard"),
            ("transform", "visibility", "external"),
            (WILDCARD, "_q", WILDCARD),
        ] {
            table.insert(element, attribute, value);
        }
        table
    }

    /// Register a suppressed value
    pub fn insert(
        &mut self,
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .entry(element.into())
            .or_default()
            .insert(attribute.into(), value.into());
        self
    }

    /// True when `attribute="value"` on `element` is omitted from XML output
    pub fn suppresses(&self, element: &str, attribute: &str, value: &str) -> bool {
        self.matches(element, attribute, value) || self.matches(WILDCARD, attribute, value)
    }

    fn matches(&self, element: &str, attribute: &str, value: &str) -> bool {
        let Some(attributes) = self.entries.get(element) else {
            return false;
        };
        match attributes
            .get(attribute)
            .or_else(|| attributes.get(WILDCARD))
        {
            Some(suppressed) => suppressed == value || suppressed == WILDCARD,
            None => false,
        }
    }

    /// Number of elements with suppressed attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is suppressed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_ranks() {
        let order = LdmlAttributeOrder::new();
        assert!(order.rank("x", "type") < order.rank("x", "count"));
        assert!(order.rank("x", "count") < order.rank("x", "gender"));
        assert!(order.rank("x", "gender") < order.rank("x", "case"));
        assert!(order.rank("x", "alt") < order.rank("x", "draft"));
        assert_eq!(order.rank("x", "notAnAttribute"), UNRANKED);
    }

    #[test]
    fn test_distinguishing() {
        let oracle = LdmlDistinguishing::new();
        assert!(oracle.is_distinguishing("unit", "type"));
        assert!(oracle.is_distinguishing("unit", "alt"));
        assert!(!oracle.is_distinguishing("unit", "draft"));
        assert!(!oracle.is_distinguishing("language", "references"));
    }

    #[test]
    fn test_suppression_table() {
        let table = SuppressionTable::ldml();
        assert!(table.suppresses("dateFormat", "type", "standard"));
        assert!(!table.suppresses("dateFormat", "type", "short"));
        assert!(table.suppresses("version", "cldrVersion", "44"));
        assert!(table.suppresses("anything", "_q", "12"));
        assert!(!table.suppresses("calendar", "type", "gregorian"));
        assert!(SuppressionTable::new().is_empty());
    }
}
