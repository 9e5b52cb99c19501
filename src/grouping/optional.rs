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

//! Group members that may be missing from complete data

use std::collections::BTreeSet;

use super::locale::LocaleContext;
use crate::error::Result;
use crate::model::{PathQuery, XPath};

/// True when `path` may be absent even though the rest of its group is present.
///
/// `is_present` answers whether a path exists in the data being checked; it
/// is consulted for the explicit `count="0"` and `count="1"` siblings.
pub(crate) fn is_optional(
    ctx: &LocaleContext<'_>,
    path: &XPath,
    is_present: &dyn Fn(&str) -> bool,
) -> Result<bool> {
    if let Some(offset) = path.find_attribute_value("relative", "type") {
        let day_field = path
            .find_attribute_value("field", "type")
            .is_some_and(|field| field.starts_with("day"));
        if day_field {
            if let Ok(offset) = offset.parse::<i64>() {
                if offset.abs() >= 2 {
                    return Ok(true);
                }
            }
        }
    }

    let Some(at) = path.segments().position(|s| s.attribute("count").is_some()) else {
        return Ok(false);
    };
    match path.segment_slice()[at].attribute("count") {
        Some("0" | "1") => Ok(true),
        Some(keyword @ ("zero" | "one")) => {
            let mut explicit = BTreeSet::new();
            for value in [0u64, 1] {
                let mut sibling = path.thaw();
                sibling.set_attribute(at as isize, "count", Some(value.to_string().as_str()))?;
                if is_present(&sibling.to_text()) {
                    explicit.insert(value);
                }
            }
            if explicit.is_empty() {
                return Ok(false);
            }
            Ok(ctx
                .plurals
                .exact_values(ctx.locale, keyword)
                .is_some_and(|values| values.is_subset(&explicit)))
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::locale::StaticLocaleData;
    use rstest::rstest;

    const PATTERN: &str =
        r#"//ldml/units/unitLength[@type="short"]/unit[@type="length-meter"]/unitPattern"#;

    fn check(data: &StaticLocaleData, text: &str, present: &[&str]) -> bool {
        let ctx = LocaleContext::new("fr", data);
        let path = XPath::parse(text).unwrap();
        let present: Vec<String> = present.iter().map(|p| p.to_string()).collect();
        is_optional(&ctx, &path, &|candidate| present.iter().any(|p| p == candidate)).unwrap()
    }

    #[rstest]
    #[case("day", "2", true)]
    #[case("day", "-3", true)]
    #[case("day", "1", false)]
    #[case("year", "2", false)]
    fn test_relative_day_offsets(#[case] field: &str, #[case] offset: &str, #[case] optional: bool) {
        let text =
            format!(r#"//ldml/dates/fields/field[@type="{field}"]/relative[@type="{offset}"]"#);
        assert_eq!(check(&StaticLocaleData::new(), &text, &[]), optional);
    }

    #[test]
    fn test_explicit_numeric_counts() {
        let data = StaticLocaleData::new();
        assert!(check(&data, &format!(r#"{PATTERN}[@count="0"]"#), &[]));
        assert!(check(&data, &format!(r#"{PATTERN}[@count="1"]"#), &[]));
        assert!(!check(&data, &format!(r#"{PATTERN}[@count="other"]"#), &[]));
    }

    #[test]
    fn test_keyword_covered_by_explicit_forms() {
        let one = format!(r#"{PATTERN}[@count="one"]"#);
        let explicit_zero = format!(r#"{PATTERN}[@count="0"]"#);
        let explicit_one = format!(r#"{PATTERN}[@count="1"]"#);

        let data = StaticLocaleData::new().with_exact_values("fr", "one", &[0, 1]);
        assert!(check(&data, &one, &[&explicit_zero, &explicit_one]));
        assert!(!check(&data, &one, &[&explicit_one]));
        assert!(!check(&data, &one, &[]));

        // `one` matching infinitely many values is never covered
        let open = StaticLocaleData::new();
        assert!(!check(&open, &one, &[&explicit_zero, &explicit_one]));
    }
}
