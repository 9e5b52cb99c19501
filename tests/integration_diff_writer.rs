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

//! Writing a flat path/value stream as nested text

use ldml_xpath::writer::transition_text;
use ldml_xpath::*;
use pretty_assertions::assert_eq;

mod utils;
use utils::SAMPLE_ITEMS;

fn write_stream(items: &[(&str, &str)], comments: Option<&mut CommentStore>) -> String {
    let mut writer = DiffWriter::with_schema(String::new(), SchemaContext::ldml());
    if let Some(comments) = comments {
        writer = writer.with_comments(comments);
    }
    for (text, value) in items {
        writer.write(&XPath::parse(text).unwrap(), value).unwrap();
    }
    writer.finish().unwrap()
}

#[test]
fn test_sample_stream() {
    let expected = "\
<ldml>
\t<identity>
\t\t<version number=\"$Revision$\"/>
\t\t<language type=\"de\"/>
\t</identity>
\t<dates>
\t\t<calendars>
\t\t\t<calendar type=\"gregorian\">
\t\t\t\t<days>
\t\t\t\t\t<dayContext type=\"format\">
\t\t\t\t\t\t<dayWidth type=\"wide\">
\t\t\t\t\t\t\t<day type=\"sun\">Sonntag</day>
\t\t\t\t\t\t\t<day type=\"mon\">Montag</day>
\t\t\t\t\t\t</dayWidth>
\t\t\t\t\t</dayContext>
\t\t\t\t</days>
\t\t\t</calendar>
\t\t</calendars>
\t\t<fields>
\t\t\t<field type=\"day\">
\t\t\t\t<relative type=\"-1\">gestern</relative>
\t\t\t\t<relative type=\"0\">heute</relative>
\t\t\t</field>
\t\t</fields>
\t</dates>
\t<units>
\t\t<unitLength type=\"long\">
\t\t\t<unit type=\"length-meter\">
\t\t\t\t<unitPattern count=\"one\">{0} Meter</unitPattern>
\t\t\t\t<unitPattern count=\"one\" case=\"genitive\">{0} Meters</unitPattern>
\t\t\t</unit>
\t\t</unitLength>
\t</units>
</ldml>
";
    assert_eq!(write_stream(SAMPLE_ITEMS, None), expected);
}

#[test]
fn test_open_and_close_counts_balance() {
    let text = write_stream(SAMPLE_ITEMS, None);
    for tag in ["identity", "dates", "calendars", "fields", "units", "unitLength", "unit"] {
        let open = text.matches(&format!("<{tag}>")).count()
            + text.matches(&format!("<{tag} ")).count();
        let close = text.matches(&format!("</{tag}>")).count();
        assert_eq!(open, close, "unbalanced <{tag}>");
    }
}

#[test]
fn test_transition_between_siblings() {
    let previous = XPath::parse("//a/b/c").unwrap();
    let current = XPath::parse("//a/b/d").unwrap();
    let text = transition_text(
        &current,
        &current,
        Some(&previous),
        Some("X"),
        None,
        &SuppressionTable::new(),
    )
    .unwrap();
    assert_eq!(text, "\t\t<d>X</d>\n");
}

#[test]
fn test_comments_follow_their_paths() {
    let mut comments = CommentStore::new();
    comments.add(CommentKind::PreBlock, "//ldml/dates", "Dates");
    comments.add(
        CommentKind::Line,
        r#"//ldml/dates/fields/field[@type="day"]/relative[@type="0"]"#,
        "today",
    );
    comments.add(CommentKind::Line, "//ldml/unknown", "dangling");

    let text = write_stream(&SAMPLE_ITEMS[4..6], Some(&mut comments));
    assert_eq!(
        text,
        "\
<ldml>
\t<!-- Dates -->
\t<dates>
\t\t<fields>
\t\t\t<field type=\"day\">
\t\t\t\t<relative type=\"-1\">gestern</relative>
\t\t\t\t<relative type=\"0\">heute</relative> <!-- today -->
\t\t\t</field>
\t\t</fields>
\t</dates>
</ldml>
"
    );
    assert_eq!(
        comments.extract_without_base(),
        vec!["dangling\t - was on: //ldml/unknown".to_string()]
    );
}

#[test]
fn test_comments_keyed_by_filtered_path() {
    let current = XPath::parse(
        r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/displayName[@alt="variant"]"#,
    )
    .unwrap();
    let filtered =
        XPath::parse(r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/displayName"#)
            .unwrap();

    let mut comments = CommentStore::new();
    comments.add(CommentKind::Line, &filtered.to_text(), "plural");
    comments.add(CommentKind::Line, &current.to_text(), "unused");

    let suppression = SuppressionTable::new();
    let mut writer = DiffWriter::new(String::new(), &suppression).with_comments(&mut comments);
    writer.write_filtered(&current, &filtered, "meters").unwrap();
    let text = writer.finish().unwrap();

    assert_eq!(
        text,
        "\
<ldml>
\t<units>
\t\t<unitLength type=\"long\">
\t\t\t<unit type=\"length-meter\">
\t\t\t\t<displayName alt=\"variant\">meters</displayName> <!-- plural -->
\t\t\t</unit>
\t\t</unitLength>
\t</units>
</ldml>
"
    );
    assert_eq!(
        comments.extract_without_base(),
        vec![format!("unused\t - was on: {}", current.to_text())]
    );
}
