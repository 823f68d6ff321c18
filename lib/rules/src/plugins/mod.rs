//! Built-in category plugins
//!
//! One plugin per item family: jewelry-type items, companion creatures and
//! general equipment. Each is a thin set of rule adjustments plus, where the
//! family needs it, derived features and a custom comparator.

mod companion;
mod equipment;
mod jewelry;

pub use companion::CompanionPlugin;
pub use equipment::EquipmentPlugin;
pub use jewelry::JewelryPlugin;

use crate::plugin::CategoryPlugin;
use compval_core::FeatureValue;
use std::sync::Arc;

pub fn builtin_plugins() -> Vec<Arc<dyn CategoryPlugin>> {
    vec![
        Arc::new(JewelryPlugin),
        Arc::new(CompanionPlugin),
        Arc::new(EquipmentPlugin),
    ]
}

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

fn table(entries: &[(&str, f64)]) -> crate::rules::FeatureTable {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Numeric elements of a list value; `None` if any element is not a number
fn numeric_list(value: &FeatureValue) -> Option<Vec<f64>> {
    value
        .as_list()?
        .iter()
        .map(FeatureValue::as_number)
        .collect()
}
