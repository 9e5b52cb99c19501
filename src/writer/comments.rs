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

//! Comments attached to paths, and their rendering

use indexmap::IndexMap;
use std::fmt::{self, Write};

/// Where a comment is placed relative to the tag of its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// Trailing the leaf on the same line
    Line,
    /// On its own lines before the tag
    PreBlock,
    /// On its own lines after the leaf
    PostBlock,
}

impl CommentKind {
    /// Every kind, in extraction order
    pub const ALL: [CommentKind; 3] = [Self::Line, Self::PreBlock, Self::PostBlock];

    fn slot(self) -> usize {
        match self {
            Self::Line => 0,
            Self::PreBlock => 1,
            Self::PostBlock => 2,
        }
    }

    /// True for the kinds written on their own lines
    pub fn is_block(self) -> bool {
        self != Self::Line
    }
}

/// Comments keyed by kind and path text.
///
/// The diff writer removes each comment as it emits it, so whatever remains
/// afterwards had no matching path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentStore {
    comments: [IndexMap<String, String>; 3],
    initial: String,
    final_comment: String,
}

impl CommentStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a comment; a second comment for the same path is appended on a new line
    pub fn add(&mut self, kind: CommentKind, path: impl Into<String>, comment: &str) -> &mut Self {
        self.comments[kind.slot()]
            .entry(path.into())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(comment);
            })
            .or_insert_with(|| comment.to_string());
        self
    }

    /// Comment attached to `path`
    pub fn get(&self, kind: CommentKind, path: &str) -> Option<&str> {
        self.comments[kind.slot()].get(path).map(String::as_str)
    }

    /// Detach and return the comment attached to `path`
    pub fn remove(&mut self, kind: CommentKind, path: &str) -> Option<String> {
        self.comments[kind.slot()].shift_remove(path)
    }

    /// Drop every comment whose text equals `text`, including the document comments
    pub fn remove_matching(&mut self, text: &str) -> &mut Self {
        if self.initial == text {
            self.initial.clear();
        }
        if self.final_comment == text {
            self.final_comment.clear();
        }
        for map in &mut self.comments {
            map.retain(|_, comment| comment.as_str() != text);
        }
        self
    }

    /// Merge `other` into this store, joining comments on the same path with a newline
    pub fn join_all(&mut self, other: &CommentStore) -> &mut Self {
        for kind in CommentKind::ALL {
            for (path, comment) in &other.comments[kind.slot()] {
                self.add(kind, path.as_str(), comment);
            }
        }
        self
    }

    /// Drain every remaining comment as `"<comment>\t - was on: <path>"`
    pub fn extract_without_base(&mut self) -> Vec<String> {
        let mut result = Vec::new();
        for map in &mut self.comments {
            for (path, comment) in map.drain(..) {
                result.push(format!("{comment}\t - was on: {path}"));
            }
        }
        result
    }

    /// Number of path comments
    pub fn len(&self) -> usize {
        self.comments.iter().map(IndexMap::len).sum()
    }

    /// True when no path comments remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Comment placed before the document
    pub fn initial_comment(&self) -> &str {
        &self.initial
    }

    /// Set the comment placed before the document
    pub fn set_initial_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.initial = comment.into();
        self
    }

    /// Comment placed after the document
    pub fn final_comment(&self) -> &str {
        &self.final_comment
    }

    /// Set the comment placed after the document
    pub fn set_final_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.final_comment = comment.into();
        self
    }
}

pub(crate) fn write_tabs<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_char('\t')?;
    }
    Ok(())
}

/// Write `comment` as `<!-- ... -->` at `indent` tabs.
///
/// Block comments start indented and end with a newline; line comments are
/// preceded by a single space. In multi-line comments blank lines are kept,
/// lines are trimmed when `indent` is non-zero, and continuation lines are
/// indented one level deeper than the comment.
pub fn write_comment<W: Write>(out: &mut W, indent: usize, comment: &str, block: bool) -> fmt::Result {
    if comment.is_empty() {
        return Ok(());
    }
    if block {
        write_tabs(out, indent)?;
    } else {
        out.write_char(' ')?;
    }
    out.write_str("<!--")?;
    if comment.find('\n').is_some_and(|at| at > 0) {
        let mut first = true;
        let mut empty_lines = 0;
        for line in comment.split('\n') {
            let line = if indent != 0 { line.trim() } else { line };
            if line.is_empty() {
                empty_lines += 1;
                continue;
            }
            for _ in 0..empty_lines {
                out.write_char('\n')?;
            }
            empty_lines = 0;
            if first {
                first = false;
                out.write_char(' ')?;
                out.write_str(line.trim())?;
            } else {
                if indent != 0 {
                    write_tabs(out, indent + 1)?;
                    out.write_char(' ')?;
                }
                out.write_str(line)?;
            }
            out.write_char('\n')?;
        }
        write_tabs(out, indent)?;
    } else {
        write!(out, " {} ", comment.trim())?;
    }
    out.write_str("-->")?;
    if block {
        out.write_char('\n')?;
    }
    Ok(())
}
