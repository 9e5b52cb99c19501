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

//! Path data model
//!
//! Segments, frozen paths, the mutable builder, and XML tag rendering.

pub mod builder;
pub mod intern;
pub mod path;
pub mod render;
pub mod segment;

pub use builder::{MergePolicy, XPathBuf};
pub use intern::{Symbol, SymbolTable, global_symbol_count};
pub use path::{PathQuery, XPath, path_without_alt};
pub use render::{XmlStyle, escape_html, to_xml_fragment};
pub use segment::Segment;
