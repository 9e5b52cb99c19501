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

//! Expansion rule for each path shape
//!
//! Every rule returns `Ok(None)` when the path has the shape's trigger but
//! fails its sanity check, and `UnsupportedShape` when the element the rule
//! rewrites is missing altogether.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use super::locale::{GrammaticalFeature, LocaleContext};
use super::path_type::PathType;
use super::LogicalGroup;
use crate::error::{Result, XPathError};
use crate::model::{PathQuery, XPath};

static METAZONES_WITH_DST: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Acre", "Africa_Western", "Alaska", "Almaty", "Amazon", "America_Central",
        "America_Eastern", "America_Mountain", "America_Pacific", "Anadyr", "Apia", "Aqtau",
        "Aqtobe", "Arabian", "Argentina", "Argentina_Western", "Armenia", "Atlantic",
        "Australia_Central", "Australia_CentralWestern", "Australia_Eastern",
        "Australia_Western", "Azerbaijan", "Azores", "Bangladesh", "Brasilia", "Cape_Verde",
        "Chatham", "Chile", "China", "Choibalsan", "Colombia", "Cook", "Cuba", "Easter",
        "Europe_Central", "Europe_Eastern", "Europe_Western", "Falkland", "Fiji", "Georgia",
        "Greenland_Eastern", "Greenland_Western", "Hawaii_Aleutian", "Hong_Kong", "Hovd",
        "Iran", "Irkutsk", "Israel", "Japan", "Kamchatka", "Korea", "Krasnoyarsk", "Lord_Howe",
        "Macau", "Magadan", "Mauritius", "Mexico_Northwest", "Mexico_Pacific", "Mongolia",
        "Moscow", "New_Caledonia", "New_Zealand", "Newfoundland", "Norfolk", "Noronha",
        "Novosibirsk", "Omsk", "Pakistan", "Paraguay", "Peru", "Philippines",
        "Pierre_Miquelon", "Qyzylorda", "Sakhalin", "Samara", "Samoa", "Taipei", "Tonga",
        "Turkmenistan", "Uruguay", "Uzbekistan", "Vanuatu", "Vladivostok", "Volgograd",
        "Yakutsk", "Yekaterinburg",
    ]
    .into_iter()
    .collect()
});

const METAZONE_FORMS: [&str; 3] = ["generic", "standard", "daylight"];

const DAYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

const AM_PM: [&str; 2] = ["am", "pm"];

const THIRTEEN_MONTH_CALENDARS: [&str; 3] = ["coptic", "ethiopic", "hebrew"];

const COMPACT_LENGTHS: [&str; 2] = ["short", "long"];

/// Sub-day units whose offset 0 means "now" rather than a calendar unit
const NOW_UNITS: [&str; 9] = [
    "second",
    "second-short",
    "second-narrow",
    "minute",
    "minute-short",
    "minute-narrow",
    "hour",
    "hour-short",
    "hour-narrow",
];

/// Expand `path` with the rule for `path_type`
pub(crate) fn expand(
    path_type: PathType,
    ctx: &LocaleContext<'_>,
    path: &XPath,
) -> Result<Option<LogicalGroup>> {
    match path_type {
        PathType::Singleton => Ok(Some(singleton(path))),
        PathType::Metazone => metazone(path),
        PathType::Days => days(path),
        PathType::DayPeriods => day_periods(ctx, path),
        PathType::Quarters => quarters(path),
        PathType::Months => months(path),
        PathType::Relative => relative(path),
        PathType::DecimalFormatLength => decimal_format_length(ctx, path),
        PathType::Count => count(ctx, path),
        PathType::CountCase => count_case(ctx, path),
        PathType::CountCaseGender => count_case_gender(ctx, path),
    }
}

pub(crate) fn singleton(path: &XPath) -> LogicalGroup {
    LogicalGroup::from([path.to_text()])
}

fn anchor(path: &XPath, path_type: PathType) -> Result<usize> {
    path_type
        .anchor()
        .and_then(|element| path.find_element(element))
        .ok_or_else(|| XPathError::unsupported_shape(path_type, path.to_text()))
}

/// Segment carrying `count`, else the shape's anchor
fn count_anchor(path: &XPath, path_type: PathType) -> Result<usize> {
    match path.segments().position(|s| s.attribute("count").is_some()) {
        Some(at) => Ok(at),
        None => anchor(path, path_type),
    }
}

/// One path per value, with `key` on segment `at` set to it
fn with_each<I, S>(path: &XPath, at: usize, key: &str, values: I) -> Result<LogicalGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut group = LogicalGroup::new();
    for value in values {
        let mut variant = path.thaw();
        variant.set_attribute(at as isize, key, Some(value.as_ref()))?;
        group.insert(variant.to_text());
    }
    Ok(group)
}

fn metazone(path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::Metazone)?;
    let observes_dst = path.segment_slice()[at]
        .attribute("type")
        .is_some_and(|zone| METAZONES_WITH_DST.contains(zone));
    if !observes_dst || !METAZONE_FORMS.contains(&path.element(-1)?) {
        return Ok(None);
    }
    let mut group = LogicalGroup::new();
    for form in METAZONE_FORMS {
        let mut variant = path.thaw();
        variant.set_element(-1, form)?;
        group.insert(variant.to_text());
    }
    Ok(Some(group))
}

fn days(path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::Days)?;
    match path.segment_slice()[at].attribute("type") {
        Some(day) if DAYS.contains(&day) => with_each(path, at, "type", DAYS).map(Some),
        _ => Ok(None),
    }
}

fn day_periods(ctx: &LocaleContext<'_>, path: &XPath) -> Result<Option<LogicalGroup>> {
    if path.element(-1)? == "alias" {
        return Ok(Some(singleton(path)));
    }
    let at = anchor(path, PathType::DayPeriods)?;
    let Some(period) = path.segment_slice()[at].attribute("type") else {
        return Ok(None);
    };
    if AM_PM.contains(&period) {
        return with_each(path, at, "type", AM_PM).map(Some);
    }
    let context = path
        .find_attribute_value("dayPeriodContext", "type")
        .unwrap_or("format");
    let periods: Vec<String> = ctx
        .day_periods
        .day_periods(ctx.locale, context)
        .into_iter()
        .filter(|p| !AM_PM.contains(&p.as_str()))
        .collect();
    if !periods.iter().any(|p| p == period) {
        return Ok(None);
    }
    with_each(path, at, "type", periods).map(Some)
}

fn quarters(path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::Quarters)?;
    match numeric_type(path, at) {
        Some(quarter) if (1..=4).contains(&quarter) => {
            with_each(path, at, "type", (1..=4).map(|q: i64| q.to_string())).map(Some)
        }
        _ => Ok(None),
    }
}

fn months(path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::Months)?;
    let Some(month) = numeric_type(path, at) else {
        return Ok(None);
    };
    let calendar = path
        .find_attribute_value("calendar", "type")
        .unwrap_or("gregorian");

    if calendar == "hebrew" {
        let valid = match path.segment_slice()[at].attribute("yeartype") {
            None => (1..=12).contains(&month),
            Some("leap") => month == 7,
            Some(_) => false,
        };
        if !valid {
            return Ok(None);
        }
        let mut group = LogicalGroup::new();
        for month in 1..=12 {
            let mut variant = path.thaw();
            variant
                .set_attribute(at as isize, "type", Some(month.to_string().as_str()))?
                .set_attribute(at as isize, "yeartype", None)?;
            group.insert(variant.to_text());
        }
        let mut leap = path.thaw();
        leap.set_attribute(at as isize, "type", Some("7"))?
            .set_attribute(at as isize, "yeartype", Some("leap"))?;
        group.insert(leap.to_text());
        return Ok(Some(group));
    }

    let last = if THIRTEEN_MONTH_CALENDARS.contains(&calendar) {
        13
    } else {
        12
    };
    if !(1..=last).contains(&month) {
        return Ok(None);
    }
    with_each(path, at, "type", (1..=last).map(|m| m.to_string())).map(Some)
}

fn relative(path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::Relative)?;
    let Some(offset) = numeric_type(path, at) else {
        return Ok(None);
    };
    if !(-3..=3).contains(&offset) {
        return Ok(None);
    }
    let field = path.find_attribute_value("field", "type").unwrap_or("");
    let offsets: Vec<i64> = if NOW_UNITS.contains(&field) {
        // offset 0 is "now", which has no siblings
        match offset {
            0 => return Ok(Some(singleton(path))),
            -1 | 1 => vec![-1, 1],
            _ => return Ok(None),
        }
    } else {
        let window = if field.starts_with("day") { 3 } else { 1 };
        if offset.abs() > window {
            return Ok(None);
        }
        (-window..=window).collect()
    };
    with_each(path, at, "type", offsets.iter().map(i64::to_string)).map(Some)
}

/// Zeros after a leading `1` (`"1000"` is 3), for compact pattern types
fn magnitude_zeros(kind: &str) -> Option<usize> {
    let zeros = kind.strip_prefix('1')?;
    zeros.bytes().all(|b| b == b'0').then_some(zeros.len())
}

fn decimal_format_length(ctx: &LocaleContext<'_>, path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = anchor(path, PathType::DecimalFormatLength)?;
    let compact = path.segment_slice()[at]
        .attribute("type")
        .is_some_and(|length| COMPACT_LENGTHS.contains(&length));
    let leaf = path.segment(-1)?;
    if !compact || leaf.name() != "pattern" || leaf.attribute("count").is_none() {
        return Ok(None);
    }
    let Some(zeros) = leaf.attribute("type").and_then(magnitude_zeros) else {
        return Ok(None);
    };
    let base = zeros / 3 * 3;
    let categories = ctx.plurals.plural_categories(ctx.locale);

    let mut group = LogicalGroup::new();
    for i in 0..3 {
        let magnitude = format!("1{}", "0".repeat(base + i));
        for category in &categories {
            let mut variant = path.thaw();
            variant
                .set_attribute(-1, "type", Some(magnitude.as_str()))?
                .set_attribute(-1, "count", Some(category.as_str()))?;
            group.insert(variant.to_text());
        }
    }
    Ok(Some(group))
}

fn count(ctx: &LocaleContext<'_>, path: &XPath) -> Result<Option<LogicalGroup>> {
    let Some(at) = path.segments().position(|s| s.attribute("count").is_some()) else {
        return Err(XPathError::unsupported_shape(PathType::Count, path.to_text()));
    };
    let categories = ctx.plurals.plural_categories(ctx.locale);
    with_each(path, at, "count", categories).map(Some)
}

fn count_case(ctx: &LocaleContext<'_>, path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = count_anchor(path, PathType::CountCase)?;
    let exempt = path
        .find_attribute_value("unit", "type")
        .is_some_and(|unit| ctx.grammar.is_exempt_unit(unit));
    if exempt || !ctx.grammar.has_grammar(ctx.locale) {
        return count(ctx, path);
    }
    let cases = ctx.grammar.cases(ctx.locale);
    grammar_variants(ctx, path, at, cases.as_deref(), None).map(Some)
}

fn count_case_gender(ctx: &LocaleContext<'_>, path: &XPath) -> Result<Option<LogicalGroup>> {
    let at = count_anchor(path, PathType::CountCaseGender)?;
    if !ctx.grammar.has_grammar(ctx.locale) {
        return count(ctx, path);
    }
    let cases = ctx.grammar.cases(ctx.locale);
    let genders = ctx.grammar.genders(ctx.locale);
    grammar_variants(ctx, path, at, cases.as_deref(), genders.as_deref()).map(Some)
}

/// Plural × case × gender variants on segment `at`; default case and gender
/// are written as absent attributes
fn grammar_variants(
    ctx: &LocaleContext<'_>,
    path: &XPath,
    at: usize,
    cases: Option<&[String]>,
    genders: Option<&[String]>,
) -> Result<LogicalGroup> {
    let categories = ctx.plurals.plural_categories(ctx.locale);
    let default_case = GrammaticalFeature::Case.default_value(cases);
    let default_gender = GrammaticalFeature::Gender.default_value(genders);
    let index = at as isize;

    let mut group = LogicalGroup::new();
    for gender in GrammaticalFeature::Gender.values_or_default(genders) {
        for case in GrammaticalFeature::Case.values_or_default(cases) {
            for category in &categories {
                let mut variant = path.thaw();
                variant
                    .set_attribute(index, "gender", explicit(&gender, default_gender))?
                    .set_attribute(index, "count", Some(category.as_str()))?
                    .set_attribute(index, "case", explicit(&case, default_case))?;
                group.insert(variant.to_text());
            }
        }
    }
    Ok(group)
}

fn explicit<'v>(value: &'v str, default: &str) -> Option<&'v str> {
    (value != default).then_some(value)
}

fn numeric_type(path: &XPath, at: usize) -> Option<i64> {
    path.segment_slice()[at].attribute("type")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::locale::StaticLocaleData;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn expand_text(data: &StaticLocaleData, locale: &str, text: &str) -> Option<LogicalGroup> {
        let path = XPath::parse(text).unwrap();
        let ctx = LocaleContext::new(locale, data);
        expand(PathType::classify(&path), &ctx, &path).unwrap()
    }

    fn group(paths: &[&str]) -> LogicalGroup {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_metazone_forms() {
        let data = StaticLocaleData::new();
        let expanded = expand_text(
            &data,
            "en",
            r#"//ldml/dates/timeZoneNames/metazone[@type="Alaska"]/long/standard"#,
        );
        assert_eq!(
            expanded,
            Some(group(&[
                r#"//ldml/dates/timeZoneNames/metazone[@type="Alaska"]/long/daylight"#,
                r#"//ldml/dates/timeZoneNames/metazone[@type="Alaska"]/long/generic"#,
                r#"//ldml/dates/timeZoneNames/metazone[@type="Alaska"]/long/standard"#,
            ]))
        );
        let no_dst = expand_text(
            &data,
            "en",
            r#"//ldml/dates/timeZoneNames/metazone[@type="India"]/long/standard"#,
        );
        assert_eq!(no_dst, None);
    }

    #[rstest]
    #[case("sun", Some(7))]
    #[case("xyz", None)]
    fn test_days(#[case] day: &str, #[case] size: Option<usize>) {
        let text = format!(
            r#"//ldml/dates/calendars/calendar[@type="gregorian"]/days/dayContext[@type="format"]/dayWidth[@type="wide"]/day[@type="{day}"]"#
        );
        let expanded = expand_text(&StaticLocaleData::new(), "en", &text);
        assert_eq!(expanded.map(|g| g.len()), size);
    }

    #[test]
    fn test_day_periods() {
        let data = StaticLocaleData::new().with_day_periods(
            "en",
            "format",
            &["midnight", "am", "noon", "pm", "morning1", "afternoon1"],
        );
        let base = r#"//ldml/dates/calendars/calendar[@type="gregorian"]/dayPeriods/dayPeriodContext[@type="format"]/dayPeriodWidth[@type="wide"]"#;
        let am_pm = expand_text(&data, "en", &format!(r#"{base}/dayPeriod[@type="pm"]"#)).unwrap();
        assert_eq!(am_pm.len(), 2);
        let periods =
            expand_text(&data, "en", &format!(r#"{base}/dayPeriod[@type="noon"]"#)).unwrap();
        assert_eq!(periods.len(), 4);
        assert!(!periods.iter().any(|p| p.contains(r#""am""#)));
        let unknown = expand_text(&data, "en", &format!(r#"{base}/dayPeriod[@type="evening2"]"#));
        assert_eq!(unknown, None);
        let alias = expand_text(&data, "en", &format!("{base}/alias"));
        assert_eq!(alias.map(|g| g.len()), Some(1));
    }

    #[rstest]
    #[case("gregorian", "1", Some(12))]
    #[case("gregorian", "13", None)]
    #[case("coptic", "13", Some(13))]
    #[case("ethiopic", "2", Some(13))]
    #[case("hebrew", "3", Some(13))]
    #[case("hebrew", "13", None)]
    fn test_months(#[case] calendar: &str, #[case] month: &str, #[case] size: Option<usize>) {
        let text = format!(
            r#"//ldml/dates/calendars/calendar[@type="{calendar}"]/months/monthContext[@type="format"]/monthWidth[@type="wide"]/month[@type="{month}"]"#
        );
        let expanded = expand_text(&StaticLocaleData::new(), "en", &text);
        assert_eq!(expanded.map(|g| g.len()), size);
    }

    #[test]
    fn test_hebrew_leap_variant() {
        let base = r#"//ldml/dates/calendars/calendar[@type="hebrew"]/months/monthContext[@type="format"]/monthWidth[@type="wide"]"#;
        let expanded = expand_text(
            &StaticLocaleData::new(),
            "en",
            &format!(r#"{base}/month[@type="7"][@yeartype="leap"]"#),
        )
        .unwrap();
        assert!(expanded.contains(&format!(r#"{base}/month[@type="7"][@yeartype="leap"]"#)));
        assert!(expanded.contains(&format!(r#"{base}/month[@type="7"]"#)));
        assert_eq!(expanded.iter().filter(|p| p.contains("yeartype")).count(), 1);
    }

    #[rstest]
    #[case("day", "-2", Some(7))]
    #[case("year", "1", Some(3))]
    #[case("year", "2", None)]
    #[case("hour", "1", Some(2))]
    #[case("hour", "0", Some(1))]
    #[case("day", "4", None)]
    #[case("day", "x", None)]
    fn test_relative(#[case] field: &str, #[case] offset: &str, #[case] size: Option<usize>) {
        let text =
            format!(r#"//ldml/dates/fields/field[@type="{field}"]/relative[@type="{offset}"]"#);
        let expanded = expand_text(&StaticLocaleData::new(), "en", &text);
        assert_eq!(expanded.map(|g| g.len()), size);
    }

    #[rstest]
    #[case("1000", 0)]
    #[case("10000", 1)]
    #[case("100000", 2)]
    #[case("1000000", 0)]
    fn test_decimal_buckets(#[case] kind: &str, #[case] position: usize) {
        let data = StaticLocaleData::new().with_plurals("en", &["one", "other"]);
        let base = r#"//ldml/numbers/decimalFormats[@numberSystem="latn"]/decimalFormatLength[@type="short"]/decimalFormat[@type="standard"]"#;
        let expanded = expand_text(
            &data,
            "en",
            &format!(r#"{base}/pattern[@type="{kind}"][@count="one"]"#),
        )
        .unwrap();
        assert_eq!(expanded.len(), 6);
        let base_zeros = kind.len() - 1 - position;
        let first = format!("1{}", "0".repeat(base_zeros));
        assert!(expanded.contains(&format!(r#"{base}/pattern[@type="{first}"][@count="other"]"#)));
    }

    #[test]
    fn test_decimal_requires_compact_pattern() {
        let data = StaticLocaleData::new();
        let text = r#"//ldml/numbers/decimalFormats[@numberSystem="latn"]/decimalFormatLength[@type="medium"]/decimalFormat[@type="standard"]/pattern[@type="1000"][@count="one"]"#;
        assert_eq!(expand_text(&data, "en", text), None);
    }

    #[test]
    fn test_count_case_gender() {
        let data = StaticLocaleData::new()
            .with_plurals("de", &["one", "other"])
            .with_cases("de", &["nominative", "accusative"])
            .with_genders("de", &["masculine", "feminine", "neuter"]);
        let text = r#"//ldml/units/unitLength[@type="long"]/compoundUnit[@type="power2"]/compoundUnitPattern1[@count="one"]"#;
        let expanded = expand_text(&data, "de", text).unwrap();
        assert_eq!(expanded.len(), 2 * 2 * 3);
        assert!(expanded.contains(text));
        assert!(expanded.contains(
            r#"//ldml/units/unitLength[@type="long"]/compoundUnit[@type="power2"]/compoundUnitPattern1[@count="other"][@gender="feminine"][@case="accusative"]"#
        ));
    }

    #[test]
    fn test_exempt_unit_falls_back_to_count() {
        let data = StaticLocaleData::new()
            .with_plurals("de", &["one", "other"])
            .with_cases("de", &["nominative", "accusative"])
            .with_exempt_unit("duration-hour");
        let text = r#"//ldml/units/unitLength[@type="long"]/unit[@type="duration-hour"]/unitPattern[@count="one"]"#;
        assert_eq!(expand_text(&data, "de", text).map(|g| g.len()), Some(2));
    }

    #[test]
    fn test_magnitude_zeros() {
        assert_eq!(magnitude_zeros("1"), Some(0));
        assert_eq!(magnitude_zeros("1000"), Some(3));
        assert_eq!(magnitude_zeros("2000"), None);
        assert_eq!(magnitude_zeros("10a"), None);
    }
}
