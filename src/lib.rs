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

//! Path algebra for LDML locale data
//!
//! Locale data is a flat set of `(path, value)` pairs where each path, such
//! as `//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]`,
//! addresses one item. This crate parses and edits those paths, writes path
//! streams back as nested XML-like text, and computes the logical groups of
//! paths that must be edited together.
//!
//! ```
//! use ldml_xpath::{PathQuery, XPath};
//!
//! let path = XPath::parse(r#"//ldml/dates/fields/field[@type="day"]/relative[@type="-1"]"#)?;
//! assert_eq!(path.find_attribute_value("field", "type"), Some("day"));
//!
//! let mut tomorrow = path.thaw();
//! tomorrow.set_attribute(-1, "type", Some("1"))?;
//! assert_eq!(tomorrow.to_text(), r#"//ldml/dates/fields/field[@type="day"]/relative[@type="1"]"#);
//! # Ok::<(), ldml_xpath::XPathError>(())
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod grouping;
pub mod model;
pub mod parser;
pub mod schema;
pub mod writer;

pub use cache::{CacheStats, PathCache, PathCacheStats, global_path_cache};
pub use config::{EngineConfig, GroupingCacheConfig, PathCacheConfig};
pub use error::{Result, XPathError};
pub use grouping::{
    GroupingEngine, LocaleContext, LogicalGroup, PathType, StaticLocaleData,
};
pub use model::{MergePolicy, PathQuery, Segment, XPath, XPathBuf, XmlStyle};
pub use schema::{SchemaContext, SuppressionTable};
pub use writer::{CommentKind, CommentStore, DiffWriter};
