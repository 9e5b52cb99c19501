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

//! XML fragment rendering of segments

use std::borrow::Cow;
use std::fmt::{self, Write};

use super::path::PathQuery;
use super::segment::Segment;
use crate::error::Result;
use crate::schema::SuppressionTable;

/// Which tag to render for a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlStyle {
    /// `<name a="v">`
    Open,
    /// `</name>`
    Close,
    /// `<name a="v"/>`
    NoValue,
}

/// Escape `& < > "` for element content and attribute values
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

impl Segment {
    /// Write this segment as an XML tag.
    ///
    /// Attributes are written in the path's attribute order; those the
    /// suppression table marks as defaults are skipped. Path-text rendering
    /// is unaffected by suppression.
    pub fn write_xml<W: Write>(
        &self,
        out: &mut W,
        style: XmlStyle,
        suppression: &SuppressionTable,
    ) -> fmt::Result {
        if style == XmlStyle::Close {
            return write!(out, "</{}>", self.name());
        }
        write!(out, "<{}", self.name())?;
        for (key, value) in self.attributes() {
            if suppression.suppresses(self.name(), key, value) {
                continue;
            }
            write!(out, " {}=\"{}\"", key, escape_html(value))?;
        }
        match style {
            XmlStyle::NoValue => out.write_str("/>"),
            _ => out.write_char('>'),
        }
    }

    /// This segment as an XML tag string
    pub fn to_xml(&self, style: XmlStyle, suppression: &SuppressionTable) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_xml(&mut out, style, suppression);
        out
    }
}

/// Render segment `index` of `path` as an XML tag
pub fn to_xml_fragment(
    path: &impl PathQuery,
    index: isize,
    style: XmlStyle,
    suppression: &SuppressionTable,
) -> Result<String> {
    Ok(path.segment(index)?.to_xml(style, suppression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::XPath;
    use rstest::rstest;

    #[rstest]
    #[case(XmlStyle::Open, r#"<dateFormatLength type="short">"#)]
    #[case(XmlStyle::Close, "</dateFormatLength>")]
    #[case(XmlStyle::NoValue, r#"<dateFormatLength type="short"/>"#)]
    fn test_styles(#[case] style: XmlStyle, #[case] expected: &str) {
        let path = XPath::parse(r#"//ldml/dateFormatLength[@type="short"]"#).unwrap();
        let rendered = to_xml_fragment(&path, -1, style, &SuppressionTable::ldml()).unwrap();
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_suppressed_defaults_only_affect_xml() {
        let text = r#"//ldml/dateFormats/dateFormatLength[@type="full"]/dateFormat[@type="standard"]"#;
        let path = XPath::parse(text).unwrap();
        let table = SuppressionTable::ldml();
        assert_eq!(to_xml_fragment(&path, -1, XmlStyle::Open, &table).unwrap(), "<dateFormat>");
        assert_eq!(
            to_xml_fragment(&path, -1, XmlStyle::Open, &SuppressionTable::new()).unwrap(),
            r#"<dateFormat type="standard">"#
        );
        assert_eq!(path.to_text(), text);
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        assert_eq!(escape_html("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));

        let path = XPath::parse(r#"//ldml/x[@type='say "hi"']"#).unwrap();
        let rendered = to_xml_fragment(&path, 0, XmlStyle::NoValue, &SuppressionTable::new()).unwrap();
        assert_eq!(rendered, r#"<ldml/>"#);
        let rendered = to_xml_fragment(&path, 1, XmlStyle::NoValue, &SuppressionTable::new()).unwrap();
        assert_eq!(rendered, r#"<x type="say &quot;hi&quot;"/>"#);
    }
}
