//! Category plugin interface
//!
//! A plugin adjusts the base rule set for the categories it supports and may
//! contribute derived features and custom per-feature comparators. Every
//! method except [`CategoryPlugin::name`] and
//! [`CategoryPlugin::supported_categories`] has a no-op default.

use crate::rules::FeatureTable;
use compval_core::{FeatureRecord, FeatureValue};
use std::collections::{BTreeMap, BTreeSet};

pub trait CategoryPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn supported_categories(&self) -> Vec<String>;

    /// Higher priority plugins are applied first and their comparators win
    fn priority(&self) -> i32 {
        0
    }

    fn supports(&self, category: &str) -> bool {
        self.supported_categories().iter().any(|c| c == category)
    }

    fn weight_overrides(&self) -> FeatureTable {
        FeatureTable::new()
    }

    fn weight_increments(&self) -> FeatureTable {
        FeatureTable::new()
    }

    fn tolerance_overrides(&self) -> FeatureTable {
        FeatureTable::new()
    }

    fn tolerance_increments(&self) -> FeatureTable {
        FeatureTable::new()
    }

    fn exact_features(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Extra features computed from the extracted ones
    fn derived_features(&self, _base: &FeatureRecord) -> BTreeMap<String, FeatureValue> {
        BTreeMap::new()
    }

    /// Similarity for `feature`, or `None` to defer to the next plugin and
    /// finally to the default comparator. Either side may be missing.
    fn custom_similarity(
        &self,
        _feature: &str,
        _target: Option<&FeatureValue>,
        _candidate: Option<&FeatureValue>,
    ) -> Option<f64> {
        None
    }
}

impl std::fmt::Debug for dyn CategoryPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryPlugin")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}
