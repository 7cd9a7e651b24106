//! Core types for export analysis.
//!
//! A [`Findings`] value is built once per analyzed export and handed straight
//! to the reporter. Keys exist only for rules that matched.

use serde::Serialize;
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// A single value extracted by one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FindingValue {
    /// First captured value of a labeled field
    Text(String),
    /// A keyword appeared somewhere in the export
    Present,
    /// Non-overlapping occurrences of a literal token (always > 0 when stored)
    Count(usize),
    /// Deduplicated captures of a repeating field (never empty when stored)
    Set(BTreeSet<String>),
    /// Summary of a list of decimal labels. Bounds are canonical digit
    /// strings, so values of any magnitude are kept.
    Numbers {
        distinct: usize,
        min: String,
        max: String,
    },
}

/// Named findings extracted from one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Findings {
    values: BTreeMap<String, FindingValue>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: FindingValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FindingValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Captured text for a first-match rule.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FindingValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Occurrence count; absent counts read as zero.
    pub fn count(&self, name: &str) -> usize {
        match self.values.get(name) {
            Some(FindingValue::Count(n)) => *n,
            _ => 0,
        }
    }

    pub fn set(&self, name: &str) -> Option<&BTreeSet<String>> {
        match self.values.get(name) {
            Some(FindingValue::Set(s)) => Some(s),
            _ => None,
        }
    }

    /// `(distinct, min, max)` for a numeric-list rule.
    pub fn numbers(&self, name: &str) -> Option<(usize, &str, &str)> {
        match self.values.get(name) {
            Some(FindingValue::Numbers { distinct, min, max }) => Some((*distinct, min.as_str(), max.as_str())),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FindingValue> {
        self.values.iter()
    }
}
