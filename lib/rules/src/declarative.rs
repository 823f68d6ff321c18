//! Plugins and rule sets declared in configuration
//!
//! ```json
//! {
//!   "base": { "weights": { "level": 1.0 }, "tolerances": { "level": 0.1 } },
//!   "plugins": [
//!     {
//!       "name": "heavy-armor",
//!       "categories": ["armor"],
//!       "priority": 5,
//!       "weight_overrides": { "defense": 4.0 },
//!       "exact_features": ["slot"]
//!     }
//!   ]
//! }
//! ```

use crate::plugin::CategoryPlugin;
use crate::registry::{RegistryBuilder, RuleRegistry};
use crate::rules::{CategoryRuleSet, FeatureTable};
use compval_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A plugin whose adjustments are plain data
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeclarativePlugin {
    pub name: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub weight_overrides: FeatureTable,
    #[serde(default)]
    pub weight_increments: FeatureTable,
    #[serde(default)]
    pub tolerance_overrides: FeatureTable,
    #[serde(default)]
    pub tolerance_increments: FeatureTable,
    #[serde(default)]
    pub exact_features: BTreeSet<String>,
}

impl CategoryPlugin for DeclarativePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_categories(&self) -> Vec<String> {
        self.categories.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn supports(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    fn weight_overrides(&self) -> FeatureTable {
        self.weight_overrides.clone()
    }

    fn weight_increments(&self) -> FeatureTable {
        self.weight_increments.clone()
    }

    fn tolerance_overrides(&self) -> FeatureTable {
        self.tolerance_overrides.clone()
    }

    fn tolerance_increments(&self) -> FeatureTable {
        self.tolerance_increments.clone()
    }

    fn exact_features(&self) -> BTreeSet<String> {
        self.exact_features.clone()
    }
}

fn default_true() -> bool {
    true
}

/// Rule configuration section: base rules plus declarative plugins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
    #[serde(default = "CategoryRuleSet::default_base")]
    pub base: CategoryRuleSet,

    /// Register the jewelry, companion and equipment plugins
    #[serde(default = "default_true")]
    pub builtin_plugins: bool,

    #[serde(default)]
    pub plugins: Vec<DeclarativePlugin>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            base: CategoryRuleSet::default_base(),
            builtin_plugins: true,
            plugins: Vec::new(),
        }
    }
}

impl RulesConfig {
    /// Freeze this configuration into a registry
    pub fn build_registry(&self) -> Result<RuleRegistry> {
        let mut builder = RegistryBuilder::new(self.base.clone());
        if self.builtin_plugins {
            builder = builder.with_builtin_plugins();
        }
        for plugin in &self.plugins {
            builder = builder.register(plugin.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compval_core::Error;

    #[test]
    fn test_rules_config_from_json() {
        let config: RulesConfig = serde_json::from_str(
            r#"{
                "base": { "weights": { "level": 1.0 }, "tolerances": { "level": 0.1 } },
                "builtin_plugins": false,
                "plugins": [
                    {
                        "name": "heavy-armor",
                        "categories": ["armor"],
                        "priority": 5,
                        "weight_overrides": { "defense": 4.0 },
                        "tolerance_increments": { "level": 0.05 },
                        "exact_features": ["slot"]
                    }
                ]
            }"#,
        )
        .unwrap();

        let registry = config.build_registry().unwrap();
        let armor = registry.rules_for("armor");

        assert_eq!(armor.weights()["defense"], 4.0);
        assert!((armor.tolerances()["level"] - 0.15).abs() < 1e-12);
        assert!(armor.rules().is_exact("slot"));
        assert_eq!(registry.final_weights("ring").len(), 1);
    }

    #[test]
    fn test_defaults_include_builtins() {
        let config: RulesConfig = serde_json::from_str("{}").unwrap();
        assert!(config.builtin_plugins);
        assert_eq!(config.base, CategoryRuleSet::default_base());

        let registry = config.build_registry().unwrap();
        assert!(registry.plugin_names().len() >= 3);
    }

    #[test]
    fn test_negative_override_rejected() {
        let config = RulesConfig {
            builtin_plugins: false,
            plugins: vec![DeclarativePlugin {
                name: "bad".to_string(),
                categories: vec!["ring".to_string()],
                weight_overrides: FeatureTable::from([("level".to_string(), -1.0)]),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(matches!(config.build_registry(), Err(Error::NegativeRule { .. })));
    }
}
