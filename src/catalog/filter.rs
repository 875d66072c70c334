//! Structured filters over catalog parts.
//!
//! Filter values are upper-cased before use. Within one part the values are
//! OR-combined; filters on different parts are AND-combined.

use crate::error::Result;
use crate::pathname::RecordPath;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// How filter values are compared with part values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Part value must equal one of the filter values
    #[default]
    Exact,
    /// Part value must match one of the filter values as a regex
    Contains,
}

/// Catalog parts that can be filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogPart {
    A,
    B,
    C,
    E,
    F,
}

impl CatalogPart {
    fn value(self, path: &RecordPath) -> &str {
        match self {
            CatalogPart::A => &path.a,
            CatalogPart::B => &path.b,
            CatalogPart::C => &path.c,
            CatalogPart::E => &path.e,
            CatalogPart::F => &path.f,
        }
    }
}

/// Filter criteria for catalog building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    parts: Vec<(CatalogPart, Vec<String>)>,
    mode: MatchMode,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter `part` by `values`. An empty value list leaves the part
    /// unfiltered; a repeated part replaces its earlier values.
    pub fn part<I, S>(mut self, part: CatalogPart, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.parts.retain(|(p, _)| *p != part);
        if !values.is_empty() {
            self.parts.push((part, values));
        }
        self
    }

    pub fn a<I: IntoIterator<Item = S>, S: Into<String>>(self, values: I) -> Self {
        self.part(CatalogPart::A, values)
    }

    pub fn b<I: IntoIterator<Item = S>, S: Into<String>>(self, values: I) -> Self {
        self.part(CatalogPart::B, values)
    }

    pub fn c<I: IntoIterator<Item = S>, S: Into<String>>(self, values: I) -> Self {
        self.part(CatalogPart::C, values)
    }

    pub fn e<I: IntoIterator<Item = S>, S: Into<String>>(self, values: I) -> Self {
        self.part(CatalogPart::E, values)
    }

    pub fn f<I: IntoIterator<Item = S>, S: Into<String>>(self, values: I) -> Self {
        self.part(CatalogPart::F, values)
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Prepare the filter for repeated matching
    pub(crate) fn compile(&self) -> Result<CompiledFilter> {
        let mut matchers = Vec::with_capacity(self.parts.len());
        for (part, values) in &self.parts {
            let upper: Vec<String> = values.iter().map(|v| v.to_uppercase()).collect();
            let matcher = match self.mode {
                MatchMode::Exact => Matcher::Exact(upper.into_iter().collect()),
                MatchMode::Contains => Matcher::Pattern(Regex::new(&upper.join("|"))?),
            };
            debug!("Catalog filter on part {:?}: {:?}", part, matcher);
            matchers.push((*part, matcher));
        }
        Ok(CompiledFilter { matchers })
    }
}

#[derive(Debug)]
enum Matcher {
    Exact(HashSet<String>),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(values) => values.contains(value),
            Matcher::Pattern(regex) => regex.is_match(value),
        }
    }
}

#[derive(Debug)]
pub(crate) struct CompiledFilter {
    matchers: Vec<(CatalogPart, Matcher)>,
}

impl CompiledFilter {
    pub(crate) fn matches(&self, path: &RecordPath) -> bool {
        self.matchers
            .iter()
            .all(|(part, matcher)| matcher.matches(part.value(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DssError;

    fn path(s: &str) -> RecordPath {
        RecordPath::parse(s).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let compiled = CatalogFilter::new().compile().unwrap();
        assert!(compiled.matches(&path("/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/")));
    }

    #[test]
    fn test_exact_values_are_uppercased() {
        let compiled = CatalogFilter::new().c(["storage"]).compile().unwrap();
        assert!(compiled.matches(&path("/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/")));
        assert!(!compiled.matches(&path("/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/")));
    }

    #[test]
    fn test_exact_does_not_match_partial_value() {
        let compiled = CatalogFilter::new().c(["FLOW"]).compile().unwrap();
        assert!(!compiled.matches(&path("/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/")));
    }

    #[test]
    fn test_contains_mode_alternates_values() {
        let compiled = CatalogFilter::new()
            .b(["shsta", "KSWCK"])
            .with_mode(MatchMode::Contains)
            .compile()
            .unwrap();
        assert!(compiled.matches(&path("/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/")));
        assert!(compiled.matches(&path("/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/")));
        assert!(!compiled.matches(&path("/CALSIM/S_OROVL/STORAGE//1MON/L2020A/")));
    }

    #[test]
    fn test_parts_are_and_combined() {
        let compiled = CatalogFilter::new()
            .b(["S_SHSTA"])
            .c(["FLOW-CHANNEL"])
            .compile()
            .unwrap();
        assert!(!compiled.matches(&path("/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/")));
    }

    #[test]
    fn test_empty_values_leave_part_unfiltered() {
        let filter = CatalogFilter::new().a(Vec::<String>::new());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let result = CatalogFilter::new()
            .c(["(FLOW"])
            .with_mode(MatchMode::Contains)
            .compile();
        assert!(matches!(result, Err(DssError::InvalidPattern(_))));
    }
}
