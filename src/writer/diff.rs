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

//! Incremental nested-text writer
//!
//! Turns a flat stream of `(path, value)` pairs into nested tags. The tags of
//! the previous path are the open stack; each transition closes what is no
//! longer shared and opens what is new, so common ancestors are written
//! once.
//!
//! For consecutive paths sharing `k` leading segments, a transition writes
//! `depth(previous) - k - 1` close lines (the previous leaf was already closed
//! inline) and `depth(current) - k - 1` open lines before the leaf. `k` is
//! clamped below both depths, so a leaf is never treated as an open ancestor.

use std::fmt::Write;

use super::comments::{CommentKind, CommentStore, write_comment, write_tabs};
use crate::error::Result;
use crate::model::{PathQuery, XPath, XmlStyle, escape_html};
use crate::schema::{SchemaContext, SuppressionTable};

/// Depth from which `current` and `previous` diverge
fn common_depth(current: &XPath, previous: Option<&XPath>) -> usize {
    match previous {
        None => 0,
        Some(previous) => current
            .first_difference(previous)
            .min(previous.len().saturating_sub(1))
            .min(current.len().saturating_sub(1)),
    }
}

/// Write close tags for `previous`'s open ancestors from the deepest down to `limit`
fn close_down_to<W: Write>(
    out: &mut W,
    previous: &XPath,
    limit: usize,
    suppression: &SuppressionTable,
) -> Result<()> {
    for i in (limit..previous.len().saturating_sub(1)).rev() {
        write_tabs(out, i)?;
        previous.segment_slice()[i].write_xml(out, XmlStyle::Close, suppression)?;
        out.write_char('\n')?;
    }
    Ok(())
}

/// Write the comment of `kind` registered for the first `index` segments of `filtered`
fn write_registered_comment<W: Write>(
    out: &mut W,
    filtered: &XPath,
    comments: &mut Option<&mut CommentStore>,
    index: usize,
    kind: CommentKind,
) -> Result<()> {
    let Some(store) = comments.as_deref_mut() else {
        return Ok(());
    };
    if index == 0 || index > filtered.len() {
        return Ok(());
    }
    let key = filtered.to_text_limit(index as isize)?;
    if let Some(comment) = store.remove(kind, &key) {
        write_comment(out, index - 1, &comment, kind.is_block())?;
    }
    Ok(())
}

/// Leaf value escaped, with embedded newlines re-indented to `depth`
fn write_value<W: Write>(out: &mut W, value: &str, depth: usize) -> Result<()> {
    let escaped = escape_html(value);
    let mut lines = escaped.split('\n');
    if let Some(first) = lines.next() {
        out.write_str(first)?;
    }
    for line in lines {
        out.write_char('\n')?;
        write_tabs(out, depth)?;
        out.write_str(line)?;
    }
    Ok(())
}

/// Write the transition from `previous` to `current`.
///
/// Tags come from `current`; comments are looked up against `filtered`,
/// which may omit attributes `current` carries. A `value` of `None` only
/// closes; an empty value writes a no-value tag. Emitted comments are
/// removed from the store.
pub fn emit_transition<W: Write>(
    out: &mut W,
    current: &XPath,
    filtered: &XPath,
    previous: Option<&XPath>,
    value: Option<&str>,
    mut comments: Option<&mut CommentStore>,
    suppression: &SuppressionTable,
) -> Result<()> {
    let limit = common_depth(current, previous);
    if let Some(previous) = previous {
        close_down_to(out, previous, limit, suppression)?;
    }
    let Some(value) = value else {
        return Ok(());
    };
    if current.is_empty() {
        return Ok(());
    }

    let leaf_depth = current.len() - 1;
    for i in limit..leaf_depth {
        write_registered_comment(out, filtered, &mut comments, i + 1, CommentKind::PreBlock)?;
        write_tabs(out, i)?;
        current.segment_slice()[i].write_xml(out, XmlStyle::Open, suppression)?;
        out.write_char('\n')?;
    }
    write_registered_comment(out, filtered, &mut comments, current.len(), CommentKind::PreBlock)?;

    write_tabs(out, leaf_depth)?;
    let leaf = &current.segment_slice()[leaf_depth];
    if value.is_empty() {
        leaf.write_xml(out, XmlStyle::NoValue, suppression)?;
    } else {
        leaf.write_xml(out, XmlStyle::Open, suppression)?;
        write_value(out, value, current.len())?;
        leaf.write_xml(out, XmlStyle::Close, suppression)?;
    }
    write_registered_comment(out, filtered, &mut comments, current.len(), CommentKind::Line)?;
    out.write_char('\n')?;
    write_registered_comment(out, filtered, &mut comments, current.len(), CommentKind::PostBlock)?;
    Ok(())
}

/// Close every open ancestor of `previous` at end of stream
pub fn emit_final_close<W: Write>(
    out: &mut W,
    previous: &XPath,
    suppression: &SuppressionTable,
) -> Result<()> {
    close_down_to(out, previous, 0, suppression)
}

/// [`emit_transition`] into a new string
pub fn transition_text(
    current: &XPath,
    filtered: &XPath,
    previous: Option<&XPath>,
    value: Option<&str>,
    comments: Option<&mut CommentStore>,
    suppression: &SuppressionTable,
) -> Result<String> {
    let mut out = String::new();
    emit_transition(&mut out, current, filtered, previous, value, comments, suppression)?;
    Ok(out)
}

/// [`emit_final_close`] into a new string
pub fn final_close_text(previous: &XPath, suppression: &SuppressionTable) -> Result<String> {
    let mut out = String::new();
    emit_final_close(&mut out, previous, suppression)?;
    Ok(out)
}

/// Streaming writer that remembers the previous path
pub struct DiffWriter<'a, W: Write> {
    out: W,
    suppression: &'a SuppressionTable,
    comments: Option<&'a mut CommentStore>,
    previous: Option<XPath>,
}

impl<'a, W: Write> DiffWriter<'a, W> {
    /// Writer into `out` without comments
    pub fn new(out: W, suppression: &'a SuppressionTable) -> Self {
        Self {
            out,
            suppression,
            comments: None,
            previous: None,
        }
    }

    /// Writer into `out` rendering with the schema's suppression table
    pub fn with_schema(out: W, schema: SchemaContext<'a>) -> Self {
        Self::new(out, schema.suppression)
    }

    /// Emit comments from `comments`, consuming them
    pub fn with_comments(mut self, comments: &'a mut CommentStore) -> Self {
        self.comments = Some(comments);
        self
    }

    /// Write one item whose comments are keyed by its own path
    pub fn write(&mut self, path: &XPath, value: &str) -> Result<()> {
        self.write_filtered(path, path, value)
    }

    /// Write one item; comments are keyed by `filtered`
    pub fn write_filtered(&mut self, path: &XPath, filtered: &XPath, value: &str) -> Result<()> {
        emit_transition(
            &mut self.out,
            path,
            filtered,
            self.previous.as_ref(),
            Some(value),
            self.comments.as_deref_mut(),
            self.suppression,
        )?;
        self.previous = Some(path.clone());
        Ok(())
    }

    /// The path written last
    pub fn previous(&self) -> Option<&XPath> {
        self.previous.as_ref()
    }

    /// Close everything still open and return the sink
    pub fn finish(mut self) -> Result<W> {
        if let Some(previous) = self.previous.take() {
            emit_final_close(&mut self.out, &previous, self.suppression)?;
        }
        Ok(self.out)
    }
}
