use super::{categories, table};
use crate::plugin::CategoryPlugin;
use crate::rules::FeatureTable;
use compval_core::{FeatureRecord, FeatureValue};
use std::collections::{BTreeMap, BTreeSet};

const STAT_FEATURES: &[&str] = &[
    "damage",
    "defense",
    "strength",
    "agility",
    "intellect",
    "stamina",
];

/// Weapons and armor
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipmentPlugin;

impl CategoryPlugin for EquipmentPlugin {
    fn name(&self) -> &str {
        "equipment"
    }

    fn supported_categories(&self) -> Vec<String> {
        categories(&["weapon", "sword", "bow", "staff", "armor", "helmet", "shield"])
    }

    fn priority(&self) -> i32 {
        5
    }

    fn weight_overrides(&self) -> FeatureTable {
        table(&[("damage", 4.0), ("defense", 3.0), ("total_stats", 2.0)])
    }

    fn weight_increments(&self) -> FeatureTable {
        table(&[("level", 1.0)])
    }

    fn tolerance_overrides(&self) -> FeatureTable {
        table(&[("damage", 0.25), ("defense", 0.25), ("total_stats", 0.2)])
    }

    fn exact_features(&self) -> BTreeSet<String> {
        BTreeSet::from(["slot".to_string()])
    }

    fn derived_features(&self, base: &FeatureRecord) -> BTreeMap<String, FeatureValue> {
        let stats: Vec<f64> = STAT_FEATURES.iter().filter_map(|f| base.number(f)).collect();
        let mut derived = BTreeMap::new();
        if !stats.is_empty() {
            derived.insert(
                "total_stats".to_string(),
                FeatureValue::Number(stats.iter().sum()),
            );
        }
        derived
    }
}
