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

//! Error types for path parsing, path mutation, rendering and grouping

use thiserror::Error;

/// Result type for path operations
pub type Result<T> = std::result::Result<T, XPathError>;

/// Errors raised by the path algebra.
///
/// None of these are transient: they describe malformed input or a caller
/// violating the path model's contract, and are surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XPathError {
    /// The path text is structurally invalid
    #[error("Malformed xpath '{path}' at {position}")]
    MalformedPath {
        /// The offending path text
        path: String,
        /// Byte offset of the first character that could not be accepted
        position: usize,
    },

    /// A mutation was attempted on a path that is frozen and shared
    #[error("Can't {operation}: path is frozen and shared")]
    ImmutableState {
        /// The attempted operation
        operation: &'static str,
    },

    /// Segment index outside the path
    #[error("Index {index} out of range for path of {len} segments")]
    IndexOutOfRange {
        /// Requested index (negative values address from the end)
        index: isize,
        /// Number of segments in the path
        len: usize,
    },

    /// A named element does not occur in the path
    #[error("Element '{element}' not found in path")]
    ElementNotFound {
        /// The element name that was looked up
        element: String,
    },

    /// Two different values were supplied for the same attribute
    #[error(
        "Conflicting values for {element}/@{attribute}: '{existing}' vs '{incoming}'"
    )]
    DuplicateAttributeConflict {
        /// Element carrying the attribute
        element: String,
        /// Attribute name
        attribute: String,
        /// Value already present
        existing: String,
        /// Value that was rejected
        incoming: String,
    },

    /// An attribute value holding both quote characters has no path-text form
    #[error("Value of @{attribute} contains both quote characters: {value}")]
    UnquotableValue {
        /// Attribute name
        attribute: String,
        /// The rejected value
        value: String,
    },

    /// An expansion strategy was requested for a path it cannot apply to
    #[error("No expansion rule of type {path_type} for '{path}'")]
    UnsupportedShape {
        /// Name of the requested path type
        path_type: String,
        /// The path that was offered
        path: String,
    },

    /// Configuration could not be loaded
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },

    /// The output sink rejected a write
    #[error("Output error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl XPathError {
    /// Create a malformed-path error
    pub fn malformed(path: impl Into<String>, position: usize) -> Self {
        Self::MalformedPath {
            path: path.into(),
            position,
        }
    }

    /// Create an index error
    pub fn index(index: isize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an element-not-found error
    pub fn element_not_found(element: impl Into<String>) -> Self {
        Self::ElementNotFound {
            element: element.into(),
        }
    }

    /// Create an attribute conflict error
    pub fn conflict(
        element: impl Into<String>,
        attribute: impl Into<String>,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        Self::DuplicateAttributeConflict {
            element: element.into(),
            attribute: attribute.into(),
            existing: existing.into(),
            incoming: incoming.into(),
        }
    }

    /// Create an unsupported-shape error
    pub fn unsupported_shape(path_type: impl ToString, path: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path_type: path_type.to_string(),
            path: path.into(),
        }
    }

    /// Byte position for malformed-path errors
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MalformedPath { position, .. } => Some(*position),
            _ => None,
        }
    }
}
