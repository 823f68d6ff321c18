//! Category rule sets
//!
//! A rule set declares which features matter for similarity, how much each
//! one weighs, how far apart two numeric values may be before they stop
//! counting as equivalent, and which features must match exactly.

use compval_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Feature name to weight or relative tolerance
pub type FeatureTable = BTreeMap<String, f64>;

/// Weights, tolerances and exact-match features for one category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryRuleSet {
    /// Feature weights (>= 0). Features absent here do not take part in scoring.
    #[serde(default)]
    pub weights: FeatureTable,

    /// Relative tolerances (>= 0) for numeric features
    #[serde(default)]
    pub tolerances: FeatureTable,

    /// Features whose mismatch scores zero rather than the neutral default
    #[serde(default)]
    pub exact_features: BTreeSet<String>,
}

impl CategoryRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules applied to every category before plugins are layered on
    pub fn default_base() -> Self {
        Self::new()
            .weight("level", 1.0)
            .tolerance("level", 0.1)
            .weight("quality", 1.5)
            .weight("attribute_type", 2.0)
            .exact("attribute_type")
    }

    #[must_use]
    pub fn weight(mut self, feature: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(feature.into(), weight);
        self
    }

    #[must_use]
    pub fn tolerance(mut self, feature: impl Into<String>, tolerance: f64) -> Self {
        self.tolerances.insert(feature.into(), tolerance);
        self
    }

    #[must_use]
    pub fn exact(mut self, feature: impl Into<String>) -> Self {
        self.exact_features.insert(feature.into());
        self
    }

    #[inline]
    pub fn weight_of(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn tolerance_of(&self, feature: &str) -> Option<f64> {
        self.tolerances.get(feature).copied()
    }

    #[inline]
    pub fn is_exact(&self, feature: &str) -> bool {
        self.exact_features.contains(feature)
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Replace entries wholesale
    pub fn apply_overrides(&mut self, weights: FeatureTable, tolerances: FeatureTable) {
        self.weights.extend(weights);
        self.tolerances.extend(tolerances);
    }

    /// Add to existing entries; features not yet present start from zero
    pub fn apply_increments(&mut self, weights: FeatureTable, tolerances: FeatureTable) {
        for (feature, delta) in weights {
            *self.weights.entry(feature).or_insert(0.0) += delta;
        }
        for (feature, delta) in tolerances {
            *self.tolerances.entry(feature).or_insert(0.0) += delta;
        }
    }

    /// Check that every weight and tolerance is a finite, non-negative number
    pub fn validate(&self, category: &str) -> Result<()> {
        check_table(&self.weights, "weight", category)?;
        check_table(&self.tolerances, "tolerance", category)
    }
}

fn check_table(table: &FeatureTable, kind: &'static str, category: &str) -> Result<()> {
    for (feature, value) in table {
        if !value.is_finite() {
            return Err(Error::Configuration(format!(
                "{} for feature '{}' in category '{}' is not finite",
                kind, feature, category
            )));
        }
        if *value < 0.0 {
            return Err(Error::NegativeRule {
                kind,
                category: category.to_string(),
                feature: feature.clone(),
            });
        }
    }
    Ok(())
}
