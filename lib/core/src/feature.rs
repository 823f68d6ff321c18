//! Feature values and feature records
//!
//! A [`FeatureRecord`] is the flat, immutable output of the feature extractor:
//! a category identifier plus a mapping from feature name to [`FeatureValue`].
//! Features are kept in a `BTreeMap` so iteration order (and therefore any
//! floating point accumulation over features) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single extracted feature value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric attribute (levels, stats, counts)
    Number(f64),
    /// String or enum-like attribute (type tags, names)
    Text(String),
    /// Ordered list, normally numeric (per-slot stats, gem levels)
    List(Vec<FeatureValue>),
}

impl FeatureValue {
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[FeatureValue]> {
        match self {
            FeatureValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Short name of the value kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureValue::Number(_) => "number",
            FeatureValue::Text(_) => "text",
            FeatureValue::List(_) => "list",
        }
    }

    /// Check that every number (including list elements) is finite
    pub fn is_finite(&self) -> bool {
        match self {
            FeatureValue::Number(n) => n.is_finite(),
            FeatureValue::Text(_) => true,
            FeatureValue::List(items) => items.iter().all(FeatureValue::is_finite),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<i64> for FeatureValue {
    fn from(n: i64) -> Self {
        FeatureValue::Number(n as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(items: Vec<f64>) -> Self {
        FeatureValue::List(items.into_iter().map(FeatureValue::Number).collect())
    }
}

/// Extracted feature set of one item
///
/// On the wire this is a flat JSON object; the category lives under
/// `"category"` (or `"kind"`), every other key is a feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    #[serde(alias = "kind")]
    pub category: String,
    #[serde(flatten)]
    pub features: BTreeMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            features: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    #[inline]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.features.get(name).and_then(FeatureValue::as_number)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the reason the record cannot be scored, if any
    pub fn check(&self) -> Option<String> {
        if self.category.trim().is_empty() {
            return Some("missing category".to_string());
        }
        self.features
            .iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(name, _)| format!("feature '{}' is not a finite number", name))
    }

    /// Copy of this record with extra features merged in.
    /// Extracted values always win over `extra` on a name clash.
    pub fn merged_with(&self, extra: BTreeMap<String, FeatureValue>) -> FeatureRecord {
        let mut merged = self.clone();
        for (name, value) in extra {
            merged.features.entry(name).or_insert(value);
        }
        merged
    }
}
