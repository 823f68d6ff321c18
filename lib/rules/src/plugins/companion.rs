use super::{categories, table};
use crate::plugin::CategoryPlugin;
use crate::rules::FeatureTable;
use compval_core::{FeatureRecord, FeatureValue};
use std::collections::{BTreeMap, BTreeSet};

const SKILLS: &str = "skills";

/// Pets, mounts and other companion creatures.
///
/// Skill lists are compared as sets (Jaccard overlap): two companions sharing
/// most skills are close regardless of the order the skills were learned in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanionPlugin;

impl CategoryPlugin for CompanionPlugin {
    fn name(&self) -> &str {
        "companion"
    }

    fn supported_categories(&self) -> Vec<String> {
        categories(&["pet", "companion", "mount"])
    }

    fn priority(&self) -> i32 {
        10
    }

    fn weight_overrides(&self) -> FeatureTable {
        table(&[(SKILLS, 4.0), ("growth", 3.0), ("talent", 2.0), ("skill_count", 1.0)])
    }

    fn tolerance_overrides(&self) -> FeatureTable {
        table(&[("growth", 0.05), ("talent", 0.1), ("skill_count", 0.0)])
    }

    fn exact_features(&self) -> BTreeSet<String> {
        BTreeSet::from(["species".to_string()])
    }

    fn derived_features(&self, base: &FeatureRecord) -> BTreeMap<String, FeatureValue> {
        let mut derived = BTreeMap::new();
        if let Some(skills) = base.get(SKILLS).and_then(FeatureValue::as_list) {
            derived.insert(
                "skill_count".to_string(),
                FeatureValue::Number(skill_set(skills).len() as f64),
            );
        }
        derived
    }

    fn custom_similarity(
        &self,
        feature: &str,
        target: Option<&FeatureValue>,
        candidate: Option<&FeatureValue>,
    ) -> Option<f64> {
        if feature != SKILLS {
            return None;
        }
        let a = skill_set(target?.as_list()?);
        let b = skill_set(candidate?.as_list()?);
        if a.is_empty() && b.is_empty() {
            return Some(1.0);
        }
        let shared = a.intersection(&b).count();
        let union = a.union(&b).count();
        Some(shared as f64 / union as f64)
    }
}

fn skill_set(skills: &[FeatureValue]) -> BTreeSet<String> {
    skills
        .iter()
        .filter_map(|skill| match skill {
            FeatureValue::Number(n) => Some(n.to_string()),
            FeatureValue::Text(s) => Some(s.to_lowercase()),
            FeatureValue::List(_) => None,
        })
        .collect()
}
