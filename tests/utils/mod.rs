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

//! Shared fixtures for integration tests

#![allow(dead_code)]

use ldml_xpath::StaticLocaleData;

/// Route `log` output to the test harness; `RUST_LOG=debug` shows cache and
/// grouping diagnostics
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// A slice of realistic locale data in file order
pub const SAMPLE_ITEMS: &[(&str, &str)] = &[
    (r#"//ldml/identity/version[@number="$Revision$"]"#, ""),
    (r#"//ldml/identity/language[@type="de"]"#, ""),
    (
        r#"//ldml/dates/calendars/calendar[@type="gregorian"]/days/dayContext[@type="format"]/dayWidth[@type="wide"]/day[@type="sun"]"#,
        "Sonntag",
    ),
    (
        r#"//ldml/dates/calendars/calendar[@type="gregorian"]/days/dayContext[@type="format"]/dayWidth[@type="wide"]/day[@type="mon"]"#,
        "Montag",
    ),
    (
        r#"//ldml/dates/fields/field[@type="day"]/relative[@type="-1"]"#,
        "gestern",
    ),
    (
        r#"//ldml/dates/fields/field[@type="day"]/relative[@type="0"]"#,
        "heute",
    ),
    (
        r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/unitPattern[@count="one"]"#,
        "{0} Meter",
    ),
    (
        r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/unitPattern[@count="one"][@case="genitive"]"#,
        "{0} Meters",
    ),
];

/// Locale data for `en`, `de` (with grammar) and `ja` (no plural forms)
pub fn locale_data() -> StaticLocaleData {
    StaticLocaleData::new()
        .with_plurals("en", &["one", "other"])
        .with_exact_values("en", "one", &[1])
        .with_day_periods(
            "en",
            "format",
            &["midnight", "am", "noon", "pm", "morning1", "afternoon1", "evening1", "night1"],
        )
        .with_plurals("de", &["one", "other"])
        .with_cases("de", &["nominative", "accusative", "dative", "genitive"])
        .with_genders("de", &["masculine", "feminine", "neuter"])
        .with_plurals("ja", &["other"])
        .with_exempt_unit("concentr-percent")
}
