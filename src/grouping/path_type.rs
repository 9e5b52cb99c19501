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

//! Path shape classification

use std::fmt;
use std::str::FromStr;

use crate::error::XPathError;
use crate::model::PathQuery;

/// Shape of a path, selecting how its logical group is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathType {
    /// No recognized shape
    Singleton,
    /// Metazone names of a zone observing daylight time
    Metazone,
    /// Weekday names
    Days,
    /// Day period names
    DayPeriods,
    /// Quarter names
    Quarters,
    /// Month names
    Months,
    /// Relative time offsets
    Relative,
    /// Compact decimal patterns
    DecimalFormatLength,
    /// Plural forms
    Count,
    /// Plural forms of long unit patterns, by grammatical case
    CountCase,
    /// Plural forms of compound unit prefixes, by case and gender
    CountCaseGender,
}

impl PathType {
    /// Shapes in classification order; the first match wins and anything
    /// else is a singleton
    pub const PRIORITY: [PathType; 10] = [
        Self::Metazone,
        Self::Days,
        Self::DayPeriods,
        Self::Quarters,
        Self::Months,
        Self::Relative,
        Self::DecimalFormatLength,
        Self::CountCaseGender,
        Self::CountCase,
        Self::Count,
    ];

    /// Classify `path` by its element names and attributes
    pub fn classify(path: &impl PathQuery) -> PathType {
        Self::PRIORITY
            .into_iter()
            .find(|path_type| path_type.matches(path))
            .unwrap_or(Self::Singleton)
    }

    /// True when `path` has this shape's trigger
    pub fn matches(self, path: &impl PathQuery) -> bool {
        match self {
            Self::Singleton => true,
            Self::Metazone => path.contains("metazone"),
            Self::Days => path.contains("days"),
            Self::DayPeriods => path.contains("dayPeriods"),
            Self::Quarters => path.contains("quarters"),
            Self::Months => path.contains("months"),
            Self::Relative => path.contains("relative"),
            Self::DecimalFormatLength => path.contains("decimalFormatLength"),
            Self::CountCaseGender => {
                is_long_unit(path) && path.contains("compoundUnitPattern1")
            }
            Self::CountCase => is_long_unit(path) && path.contains("unitPattern"),
            Self::Count => path.contains_attribute("count"),
        }
    }

    /// True when the expansion reads locale data, so groups are cached per locale
    pub fn is_locale_dependent(self) -> bool {
        matches!(
            self,
            Self::Count | Self::DayPeriods | Self::CountCase | Self::CountCaseGender
        )
    }

    /// Element whose attributes the expansion rewrites, when fixed by the shape
    pub fn anchor(self) -> Option<&'static str> {
        match self {
            Self::Singleton | Self::Count => None,
            Self::Metazone => Some("metazone"),
            Self::Days => Some("day"),
            Self::DayPeriods => Some("dayPeriod"),
            Self::Quarters => Some("quarter"),
            Self::Months => Some("month"),
            Self::Relative => Some("relative"),
            Self::DecimalFormatLength => Some("decimalFormatLength"),
            Self::CountCase => Some("unitPattern"),
            Self::CountCaseGender => Some("compoundUnitPattern1"),
        }
    }

    /// Upper snake case name
    pub fn name(self) -> &'static str {
        match self {
            Self::Singleton => "SINGLETON",
            Self::Metazone => "METAZONE",
            Self::Days => "DAYS",
            Self::DayPeriods => "DAY_PERIODS",
            Self::Quarters => "QUARTERS",
            Self::Months => "MONTHS",
            Self::Relative => "RELATIVE",
            Self::DecimalFormatLength => "DECIMAL_FORMAT_LENGTH",
            Self::Count => "COUNT",
            Self::CountCase => "COUNT_CASE",
            Self::CountCaseGender => "COUNT_CASE_GENDER",
        }
    }
}

fn is_long_unit(path: &impl PathQuery) -> bool {
    path.find_attribute_value("unitLength", "type") == Some("long")
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathType {
    type Err = XPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(Self::Singleton)
            .chain(Self::PRIORITY)
            .find(|path_type| path_type.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| XPathError::InvalidConfig {
                message: format!("unknown path type '{s}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::XPath;
    use rstest::rstest;

    #[rstest]
    #[case(r#"//ldml/identity/version[@number="1"]"#, PathType::Singleton)]
    #[case(
        r#"//ldml/dates/timeZoneNames/metazone[@type="Alaska"]/long/generic"#,
        PathType::Metazone
    )]
    #[case(
        r#"//ldml/dates/calendars/calendar[@type="gregorian"]/days/dayContext[@type="format"]/dayWidth[@type="wide"]/day[@type="sun"]"#,
        PathType::Days
    )]
    #[case(
        r#"//ldml/dates/calendars/calendar[@type="gregorian"]/dayPeriods/dayPeriodContext[@type="format"]/dayPeriodWidth[@type="wide"]/dayPeriod[@type="am"]"#,
        PathType::DayPeriods
    )]
    #[case(
        r#"//ldml/dates/calendars/calendar[@type="gregorian"]/quarters/quarterContext[@type="format"]/quarterWidth[@type="abbreviated"]/quarter[@type="1"]"#,
        PathType::Quarters
    )]
    #[case(
        r#"//ldml/dates/calendars/calendar[@type="hebrew"]/months/monthContext[@type="format"]/monthWidth[@type="wide"]/month[@type="1"]"#,
        PathType::Months
    )]
    #[case(r#"//ldml/dates/fields/field[@type="day"]/relative[@type="-1"]"#, PathType::Relative)]
    #[case(
        r#"//ldml/numbers/decimalFormats[@numberSystem="latn"]/decimalFormatLength[@type="short"]/decimalFormat[@type="standard"]/pattern[@type="1000"][@count="one"]"#,
        PathType::DecimalFormatLength
    )]
    #[case(
        r#"//ldml/units/unitLength[@type="long"]/compoundUnit[@type="power2"]/compoundUnitPattern1[@count="one"]"#,
        PathType::CountCaseGender
    )]
    #[case(
        r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/unitPattern[@count="one"]"#,
        PathType::CountCase
    )]
    #[case(
        r#"//ldml/units/unitLength[@type="short"]/unit[@type="length-meter"]/unitPattern[@count="one"]"#,
        PathType::Count
    )]
    #[case(
        r#"//ldml/dates/fields/field[@type="day"]/relativeTime[@type="future"]/relativeTimePattern[@count="one"]"#,
        PathType::Count
    )]
    fn test_classify(#[case] text: &str, #[case] expected: PathType) {
        let path = XPath::parse(text).unwrap();
        assert_eq!(PathType::classify(&path), expected);
    }

    #[test]
    fn test_locale_dependence() {
        let dependent: Vec<PathType> = PathType::PRIORITY
            .into_iter()
            .filter(|t| t.is_locale_dependent())
            .collect();
        assert_eq!(
            dependent,
            vec![
                PathType::DayPeriods,
                PathType::CountCaseGender,
                PathType::CountCase,
                PathType::Count
            ]
        );
        assert!(!PathType::Singleton.is_locale_dependent());
    }

    #[test]
    fn test_names_round_trip() {
        for path_type in PathType::PRIORITY {
            assert_eq!(path_type.to_string().parse::<PathType>().unwrap(), path_type);
        }
        assert_eq!("count_case".parse::<PathType>().unwrap(), PathType::CountCase);
        assert!("unknown".parse::<PathType>().is_err());
    }
}
