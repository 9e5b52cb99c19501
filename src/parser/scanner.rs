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

//! Byte-level scanner for path text
//!
//! Single left-to-right pass over the input bytes. Only ASCII bytes are
//! structural, so multi-byte UTF-8 sequences inside names and values pass
//! through untouched and every slice boundary falls on a char boundary.

use crate::error::{Result, XPathError};
use crate::model::XPathBuf;

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Reading an element name, or between steps
    Plain,
    /// After `[`, expecting `@`
    InBracket,
    /// Reading an attribute name
    AfterAt,
    /// After `=`, expecting an opening quote
    AfterEquals,
    /// Inside a value opened by the given quote byte
    InQuoted(u8),
    /// After a closing quote, expecting `]`
    ExpectClose,
}

/// Scans path text into a [`XPathBuf`].
///
/// Element names and attributes are committed as soon as they end, so the
/// target is only consistent once [`run`](Scanner::run) returns `Ok`.
pub(crate) struct Scanner<'input, 'path> {
    text: &'input str,
    bytes: &'input [u8],
    pos: usize,
    state: State,
    /// Start of the pending element name; `None` right after a `]`
    name_start: Option<usize>,
    /// Start of the pending attribute name or value
    token_start: usize,
    attribute: &'input str,
    target: &'path mut XPathBuf,
}

impl<'input, 'path> Scanner<'input, 'path> {
    /// Scanner over `text[start..]`, appending to `target`
    pub(crate) fn new(text: &'input str, start: usize, target: &'path mut XPathBuf) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: start,
            state: State::Plain,
            name_start: Some(start),
            token_start: start,
            attribute: "",
            target,
        }
    }

    #[inline]
    fn error(&self, position: usize) -> XPathError {
        XPathError::malformed(self.text, position)
    }

    #[inline(always)]
    fn slice(&self, start: usize, end: usize) -> &'input str {
        &self.text[start..end]
    }

    /// Commit the pending element name ending at `end`
    fn commit_element(&mut self, end: usize) -> Result<()> {
        match self.name_start {
            Some(start) if start < end => {
                let name = self.slice(start, end);
                log::trace!("commit element '{name}'");
                self.target.add_element(name);
                Ok(())
            }
            // empty name: `//a//b`, `//a/[@x="1"]` or a trailing `/`
            Some(_) => Err(self.error(end)),
            // nothing pending: a step that ended with `]`
            None => Ok(()),
        }
    }

    /// Scan to the end of input
    pub(crate) fn run(mut self) -> Result<()> {
        let len = self.bytes.len();
        while self.pos < len {
            let i = self.pos;
            let byte = self.bytes[i];
            match self.state {
                State::InQuoted(quote) => {
                    if byte == quote {
                        let value = self.slice(self.token_start, i);
                        log::trace!("commit attribute {}='{}'", self.attribute, value);
                        self.target.add_attribute(self.attribute, value)?;
                        self.state = State::ExpectClose;
                    }
                }
                State::Plain => match byte {
                    b'/' | b'[' => {
                        self.commit_element(i)?;
                        if byte == b'/' {
                            self.name_start = Some(i + 1);
                        } else {
                            self.name_start = None;
                            self.state = State::InBracket;
                        }
                    }
                    b']' | b'@' | b'=' | b'"' | b'\'' => return Err(self.error(i)),
                    _ if byte.is_ascii_whitespace() => return Err(self.error(i)),
                    // name bytes are only legal while a name is pending
                    _ if self.name_start.is_none() => return Err(self.error(i)),
                    _ => {}
                },
                State::InBracket => {
                    if byte != b'@' {
                        return Err(self.error(i));
                    }
                    self.token_start = i + 1;
                    self.state = State::AfterAt;
                }
                State::AfterAt => match byte {
                    b'=' => {
                        if self.token_start >= i {
                            return Err(self.error(i));
                        }
                        self.attribute = self.slice(self.token_start, i);
                        self.state = State::AfterEquals;
                    }
                    b'/' | b'[' | b']' | b'@' | b'"' | b'\'' => return Err(self.error(i)),
                    _ if byte.is_ascii_whitespace() => return Err(self.error(i)),
                    _ => {}
                },
                State::AfterEquals => match byte {
                    b'"' | b'\'' => {
                        self.token_start = i + 1;
                        self.state = State::InQuoted(byte);
                    }
                    _ => return Err(self.error(i)),
                },
                State::ExpectClose => {
                    if byte != b']' {
                        return Err(self.error(i));
                    }
                    self.state = State::Plain;
                }
            }
            self.pos += 1;
        }

        if self.state != State::Plain {
            return Err(self.error(len));
        }
        self.commit_element(len)
    }
}
