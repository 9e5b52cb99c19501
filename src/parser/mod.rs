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

//! Path text parser
//!
//! ```text
//! path      := "//" step ("/" step)*
//! step      := name predicate*
//! predicate := "[" "@" attrName "=" quote value quote "]"
//! ```
//!
//! Parsing is fail-fast: the first byte that the current scanner state does
//! not accept produces [`XPathError::MalformedPath`] with its offset.

mod scanner;

use crate::error::{Result, XPathError};
use crate::model::{PathQuery, XPath, XPathBuf};

use scanner::Scanner;

const ABSOLUTE_PREFIX: &str = "//";
const PARENT_PREFIX: &str = "../";

/// Parse absolute path text into a frozen path
pub fn parse(text: &str) -> Result<XPath> {
    Ok(XPathBuf::parse(text)?.freeze())
}

/// Replace the contents of `target` with the parsed absolute path
pub(crate) fn parse_into(target: &mut XPathBuf, text: &str) -> Result<()> {
    if !text.starts_with(ABSOLUTE_PREFIX) {
        return Err(XPathError::malformed(text, 0));
    }
    target.clear();
    Scanner::new(text, ABSOLUTE_PREFIX.len(), target).run()
}

/// Apply relative path text to `target`.
///
/// `//...` replaces the path, each leading `../` pops one segment, and the
/// rest (with or without a leading `/`) is appended. On error `target` is
/// left unchanged.
pub(crate) fn parse_relative(target: &mut XPathBuf, text: &str) -> Result<()> {
    let mut scratch = target.clone();
    if text.starts_with(ABSOLUTE_PREFIX) {
        parse_into(&mut scratch, text)?;
        *target = scratch;
        return Ok(());
    }

    let mut start = 0;
    let mut popped = false;
    while text[start..].starts_with(PARENT_PREFIX) {
        if scratch.is_empty() {
            return Err(XPathError::index(-1, 0));
        }
        scratch.trim_last()?;
        start += PARENT_PREFIX.len();
        popped = true;
    }
    if text[start..].starts_with('/') {
        start += 1;
    }
    // a bare `../` only climbs
    if !(popped && start == text.len()) {
        Scanner::new(text, start, &mut scratch).run()?;
    }
    log::trace!("applied relative path '{text}'");
    *target = scratch;
    Ok(())
}
