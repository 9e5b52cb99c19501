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

//! Locale data consumed by the grouping engine
//!
//! Plural rules, day periods and grammatical features live outside this
//! crate. The engine only asks the questions below; [`StaticLocaleData`] is
//! an in-memory answer sheet for tests and small tools.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Result, XPathError};

/// Plural rules of a locale
pub trait PluralOracle: Send + Sync {
    /// Plural categories used by `locale` (`one`, `other`, ...)
    fn plural_categories(&self, locale: &str) -> Vec<String>;

    /// Every integer matched by `keyword` in `locale`, or `None` when the
    /// keyword matches infinitely many values
    fn exact_values(&self, locale: &str, keyword: &str) -> Option<BTreeSet<u64>>;
}

/// Day periods of a locale
pub trait DayPeriodOracle: Send + Sync {
    /// Ordered day periods of `locale` for a `dayPeriodContext` type
    fn day_periods(&self, locale: &str, context: &str) -> Vec<String>;
}

/// Grammatical features of a locale
pub trait GrammarOracle: Send + Sync {
    /// True when `locale` has any grammatical data registered
    fn has_grammar(&self, locale: &str) -> bool;

    /// Grammatical cases of `locale`
    fn cases(&self, locale: &str) -> Option<Vec<String>>;

    /// Grammatical genders of `locale`
    fn genders(&self, locale: &str) -> Option<Vec<String>>;

    /// True when units of this type never carry case forms
    fn is_exempt_unit(&self, unit: &str) -> bool;
}

/// A grammatical feature written as a path attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalFeature {
    /// `case`
    Case,
    /// `gender`
    Gender,
}

impl GrammaticalFeature {
    /// Attribute carrying the feature
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Gender => "gender",
        }
    }

    /// Value written as an absent attribute, given the locale's values
    pub fn default_value(self, values: Option<&[String]>) -> &'static str {
        match self {
            Self::Case => "nominative",
            Self::Gender => match values {
                Some(values) if !values.iter().any(|v| v == "neuter") => "masculine",
                _ => "neuter",
            },
        }
    }

    /// The locale's values, or just the default when it has none
    pub fn values_or_default(self, values: Option<&[String]>) -> Vec<String> {
        match values {
            Some(values) if !values.is_empty() => values.to_vec(),
            _ => vec![self.default_value(values).to_string()],
        }
    }
}

impl fmt::Display for GrammaticalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// A locale id with the oracles that answer for it
#[derive(Clone, Copy)]
pub struct LocaleContext<'a> {
    /// Locale id, e.g. `de` or `pt_PT`
    pub locale: &'a str,
    /// Plural rules
    pub plurals: &'a dyn PluralOracle,
    /// Day periods
    pub day_periods: &'a dyn DayPeriodOracle,
    /// Grammatical features
    pub grammar: &'a dyn GrammarOracle,
}

impl<'a> LocaleContext<'a> {
    /// Context whose oracles are all backed by `data`
    pub fn new<D>(locale: &'a str, data: &'a D) -> Self
    where
        D: PluralOracle + DayPeriodOracle + GrammarOracle,
    {
        Self {
            locale,
            plurals: data,
            day_periods: data,
            grammar: data,
        }
    }
}

impl fmt::Debug for LocaleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleContext")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct LocaleEntry {
    plurals: Vec<String>,
    exact_values: BTreeMap<String, BTreeSet<u64>>,
    day_periods: BTreeMap<String, Vec<String>>,
    cases: Option<Vec<String>>,
    genders: Option<Vec<String>>,
}

/// In-memory locale data.
///
/// Locales without registered plurals use `other` only; locales without
/// day periods have none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticLocaleData {
    locales: BTreeMap<String, LocaleEntry>,
    exempt_units: BTreeSet<String>,
}

impl StaticLocaleData {
    /// No locales
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON in the shape produced by [`to_json_string`](Self::to_json_string)
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| XPathError::InvalidConfig {
            message: format!("locale data: {e}"),
        })
    }

    /// Serialize to JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| XPathError::InvalidConfig {
            message: format!("locale data: {e}"),
        })
    }

    fn entry(&mut self, locale: &str) -> &mut LocaleEntry {
        self.locales.entry(locale.to_string()).or_default()
    }

    /// Set the plural categories of `locale`
    pub fn with_plurals(mut self, locale: &str, categories: &[&str]) -> Self {
        self.entry(locale).plurals = to_strings(categories);
        self
    }

    /// Declare the finite set of integers `keyword` matches in `locale`
    pub fn with_exact_values(mut self, locale: &str, keyword: &str, values: &[u64]) -> Self {
        self.entry(locale)
            .exact_values
            .insert(keyword.to_string(), values.iter().copied().collect());
        self
    }

    /// Set the day periods of `locale` for a context type
    pub fn with_day_periods(mut self, locale: &str, context: &str, periods: &[&str]) -> Self {
        self.entry(locale)
            .day_periods
            .insert(context.to_string(), to_strings(periods));
        self
    }

    /// Set the grammatical cases of `locale`
    pub fn with_cases(mut self, locale: &str, cases: &[&str]) -> Self {
        self.entry(locale).cases = Some(to_strings(cases));
        self
    }

    /// Set the grammatical genders of `locale`
    pub fn with_genders(mut self, locale: &str, genders: &[&str]) -> Self {
        self.entry(locale).genders = Some(to_strings(genders));
        self
    }

    /// Exempt a unit type from case expansion
    pub fn with_exempt_unit(mut self, unit: &str) -> Self {
        self.exempt_units.insert(unit.to_string());
        self
    }

    /// Registered locale ids
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl PluralOracle for StaticLocaleData {
    fn plural_categories(&self, locale: &str) -> Vec<String> {
        match self.locales.get(locale) {
            Some(entry) if !entry.plurals.is_empty() => entry.plurals.clone(),
            _ => vec!["other".to_string()],
        }
    }

    fn exact_values(&self, locale: &str, keyword: &str) -> Option<BTreeSet<u64>> {
        self.locales.get(locale)?.exact_values.get(keyword).cloned()
    }
}

impl DayPeriodOracle for StaticLocaleData {
    fn day_periods(&self, locale: &str, context: &str) -> Vec<String> {
        self.locales
            .get(locale)
            .and_then(|entry| entry.day_periods.get(context))
            .cloned()
            .unwrap_or_default()
    }
}

impl GrammarOracle for StaticLocaleData {
    fn has_grammar(&self, locale: &str) -> bool {
        self.locales
            .get(locale)
            .is_some_and(|entry| entry.cases.is_some() || entry.genders.is_some())
    }

    fn cases(&self, locale: &str) -> Option<Vec<String>> {
        self.locales.get(locale)?.cases.clone()
    }

    fn genders(&self, locale: &str) -> Option<Vec<String>> {
        self.locales.get(locale)?.genders.clone()
    }

    fn is_exempt_unit(&self, unit: &str) -> bool {
        self.exempt_units.contains(unit)
    }
}
