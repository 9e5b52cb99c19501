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

//! Symbol interning for element and attribute names
//!
//! Element and attribute names repeat across millions of paths, and segment
//! comparison is the hot operation of sorting and caching. Interning gives
//! every distinct name a single shared allocation so equality is usually a
//! pointer comparison.

use dashmap::DashMap;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// An interned name
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Intern `name` in the global symbol table
    pub fn intern(name: &str) -> Self {
        GLOBAL_SYMBOLS.intern(name)
    }

    /// The name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both symbols share one allocation
    #[inline]
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // symbols from different tables still compare by content
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Symbol {}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.0.cmp(&other.0)
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

/// Thread-safe symbol table
pub struct SymbolTable {
    symbols: DashMap<Arc<str>, ()>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            symbols: DashMap::new(),
        }
    }

    /// Intern a name, returning the shared symbol
    pub fn intern(&self, name: &str) -> Symbol {
        // Fast path: already interned
        if let Some(entry) = self.symbols.get(name) {
            return Symbol(Arc::clone(entry.key()));
        }

        // Slow path: a racing thread may insert first, in which case its Arc wins
        let candidate: Arc<str> = Arc::from(name);
        let entry = self.symbols.entry(candidate).or_insert(());
        Symbol(Arc::clone(entry.key()))
    }

    /// Number of distinct names interned
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

static GLOBAL_SYMBOLS: once_cell::sync::Lazy<SymbolTable> = once_cell::sync::Lazy::new(|| {
    let table = SymbolTable::new();

    // Pre-intern the names found in almost every LDML path
    let common = [
        "ldml",
        "identity",
        "version",
        "language",
        "territory",
        "dates",
        "calendars",
        "calendar",
        "months",
        "monthContext",
        "monthWidth",
        "month",
        "days",
        "dayContext",
        "dayWidth",
        "day",
        "quarters",
        "quarter",
        "dayPeriods",
        "dayPeriod",
        "fields",
        "field",
        "relative",
        "timeZoneNames",
        "metazone",
        "numbers",
        "decimalFormats",
        "decimalFormatLength",
        "decimalFormat",
        "pattern",
        "units",
        "unitLength",
        "unit",
        "unitPattern",
        "alias",
        "type",
        "count",
        "case",
        "gender",
        "alt",
        "draft",
    ];
    for name in common {
        table.intern(name);
    }

    table
});

/// Number of names in the global symbol table
pub fn global_symbol_count() -> usize {
    GLOBAL_SYMBOLS.len()
}
