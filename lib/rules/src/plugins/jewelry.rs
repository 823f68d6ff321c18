use super::{categories, numeric_list, table};
use crate::plugin::CategoryPlugin;
use crate::rules::FeatureTable;
use compval_core::{FeatureRecord, FeatureValue};
use std::collections::{BTreeMap, BTreeSet};

const GEM_LEVELS: &str = "gem_levels";

/// Rings, necklaces and other socketed jewelry.
///
/// Gem order inside the item does not matter to buyers, so gem levels are
/// compared as a multiset rather than slot by slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct JewelryPlugin;

impl CategoryPlugin for JewelryPlugin {
    fn name(&self) -> &str {
        "jewelry"
    }

    fn supported_categories(&self) -> Vec<String> {
        categories(&["ring", "necklace", "earring", "bracelet", "amulet"])
    }

    fn priority(&self) -> i32 {
        10
    }

    fn weight_overrides(&self) -> FeatureTable {
        table(&[(GEM_LEVELS, 3.0), ("gem_total", 1.5), ("enhancement", 2.0)])
    }

    fn tolerance_overrides(&self) -> FeatureTable {
        table(&[("gem_total", 0.15), ("enhancement", 0.0)])
    }

    fn exact_features(&self) -> BTreeSet<String> {
        BTreeSet::from(["set_name".to_string()])
    }

    fn derived_features(&self, base: &FeatureRecord) -> BTreeMap<String, FeatureValue> {
        let mut derived = BTreeMap::new();
        if let Some(levels) = base.get(GEM_LEVELS).and_then(numeric_list) {
            let total: f64 = levels.iter().sum();
            let socketed = levels.iter().filter(|l| **l > 0.0).count();
            derived.insert("gem_total".to_string(), FeatureValue::Number(total));
            derived.insert("gem_count".to_string(), FeatureValue::Number(socketed as f64));
        }
        derived
    }

    fn custom_similarity(
        &self,
        feature: &str,
        target: Option<&FeatureValue>,
        candidate: Option<&FeatureValue>,
    ) -> Option<f64> {
        if feature != GEM_LEVELS {
            return None;
        }
        let a = numeric_list(target?)?;
        let b = numeric_list(candidate?)?;
        Some(gem_multiset_similarity(a, b))
    }
}

/// Compare two sets of gem levels ignoring slot order; missing gems count as level 0
fn gem_multiset_similarity(mut a: Vec<f64>, mut b: Vec<f64>) -> f64 {
    let len = a.len().max(b.len());
    if len == 0 {
        return 1.0;
    }
    a.resize(len, 0.0);
    b.resize(len, 0.0);
    a.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    b.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = a
        .iter()
        .zip(&b)
        .map(|(x, y)| {
            let max = x.abs().max(y.abs());
            if max == 0.0 {
                1.0
            } else {
                (1.0 - (x - y).abs() / max).max(0.0)
            }
        })
        .sum();
    total / len as f64
}
