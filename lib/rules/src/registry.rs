//! Category rule registry
//!
//! Built once at process start from a base rule set and a list of plugins,
//! read-only afterwards. Every category named by a registered plugin is
//! resolved and validated at build time, so lookups are plain map hits and
//! the registry can be shared by reference (or `Arc`) across threads.

use crate::plugin::CategoryPlugin;
use crate::plugins::builtin_plugins;
use crate::rules::{CategoryRuleSet, FeatureTable};
use ahash::{AHashMap, AHashSet};
use compval_core::{Error, FeatureRecord, FeatureValue, Result};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

const BASE_CATEGORY: &str = "*";

/// The rules in force for one category: composed rule set plus the plugins
/// that apply to it, highest priority first
#[derive(Debug)]
pub struct EffectiveRules {
    category: String,
    rules: CategoryRuleSet,
    plugins: Vec<Arc<dyn CategoryPlugin>>,
}

impl EffectiveRules {
    /// Compose `base` with `plugins`, which must already be sorted by
    /// descending priority. Each plugin applies its overrides, then its
    /// increments.
    pub fn compose(
        category: &str,
        base: &CategoryRuleSet,
        plugins: Vec<Arc<dyn CategoryPlugin>>,
    ) -> Result<Self> {
        let mut rules = base.clone();
        for plugin in &plugins {
            rules.apply_overrides(plugin.weight_overrides(), plugin.tolerance_overrides());
            rules.apply_increments(plugin.weight_increments(), plugin.tolerance_increments());
            rules.exact_features.extend(plugin.exact_features());
        }
        rules.validate(category)?;

        Ok(Self {
            category: category.to_string(),
            rules,
            plugins,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn rules(&self) -> &CategoryRuleSet {
        &self.rules
    }

    pub fn weights(&self) -> &FeatureTable {
        &self.rules.weights
    }

    pub fn tolerances(&self) -> &FeatureTable {
        &self.rules.tolerances
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// First non-`None` answer from the applicable plugins, in priority order.
    /// Non-finite answers are ignored; finite ones are clamped to `[0, 1]`.
    pub fn custom_similarity(
        &self,
        feature: &str,
        target: Option<&FeatureValue>,
        candidate: Option<&FeatureValue>,
    ) -> Option<f64> {
        self.plugins.iter().find_map(|plugin| {
            plugin
                .custom_similarity(feature, target, candidate)
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 1.0))
        })
    }

    /// The record with every plugin's derived features merged in
    pub fn enrich<'a>(&self, record: &'a FeatureRecord) -> Cow<'a, FeatureRecord> {
        let mut derived = BTreeMap::new();
        for plugin in &self.plugins {
            for (name, value) in plugin.derived_features(record) {
                derived.entry(name).or_insert(value);
            }
        }

        if derived.is_empty() {
            Cow::Borrowed(record)
        } else {
            Cow::Owned(record.merged_with(derived))
        }
    }
}

/// Collects the base rules and plugins before the registry is frozen
pub struct RegistryBuilder {
    base: CategoryRuleSet,
    plugins: Vec<Arc<dyn CategoryPlugin>>,
}

impl RegistryBuilder {
    pub fn new(base: CategoryRuleSet) -> Self {
        Self {
            base,
            plugins: Vec::new(),
        }
    }

    #[must_use]
    pub fn register<P: CategoryPlugin + 'static>(self, plugin: P) -> Self {
        self.register_arc(Arc::new(plugin))
    }

    #[must_use]
    pub fn register_arc(mut self, plugin: Arc<dyn CategoryPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn with_builtin_plugins(mut self) -> Self {
        self.plugins.extend(builtin_plugins());
        self
    }

    pub fn build(self) -> Result<RuleRegistry> {
        let mut names = AHashSet::new();
        for plugin in &self.plugins {
            if !names.insert(plugin.name().to_string()) {
                return Err(Error::Configuration(format!(
                    "plugin '{}' registered twice",
                    plugin.name()
                )));
            }
        }

        let base = Arc::new(EffectiveRules::compose(BASE_CATEGORY, &self.base, Vec::new())?);

        // Stable sort keeps registration order among equal priorities
        let mut ordered = self.plugins;
        ordered.sort_by(|a, b| b.priority().cmp(&a.priority()));

        let mut resolved = AHashMap::new();
        for plugin in &ordered {
            for category in plugin.supported_categories() {
                if resolved.contains_key(&category) {
                    continue;
                }
                let applicable: Vec<_> = ordered
                    .iter()
                    .filter(|p| p.supports(&category))
                    .cloned()
                    .collect();
                let effective = EffectiveRules::compose(&category, &self.base, applicable)?;
                tracing::debug!(
                    category = %category,
                    plugins = ?effective.plugin_names(),
                    features = effective.weights().len(),
                    "resolved category rules"
                );
                resolved.insert(category, Arc::new(effective));
            }
        }

        Ok(RuleRegistry {
            base,
            resolved,
            plugin_names: ordered.iter().map(|p| p.name().to_string()).collect(),
        })
    }
}

/// Read-only mapping from category to its effective rules
#[derive(Debug)]
pub struct RuleRegistry {
    base: Arc<EffectiveRules>,
    resolved: AHashMap<String, Arc<EffectiveRules>>,
    plugin_names: Vec<String>,
}

impl RuleRegistry {
    pub fn builder(base: CategoryRuleSet) -> RegistryBuilder {
        RegistryBuilder::new(base)
    }

    /// Default base rules with the built-in plugins registered
    pub fn with_defaults() -> Result<Self> {
        RegistryBuilder::new(CategoryRuleSet::default_base())
            .with_builtin_plugins()
            .build()
    }

    /// Base rules only
    pub fn base_only(base: CategoryRuleSet) -> Result<Self> {
        RegistryBuilder::new(base).build()
    }

    /// Rules for `category`; categories no plugin supports get the base rules
    pub fn rules_for(&self, category: &str) -> &EffectiveRules {
        self.resolved
            .get(category)
            .map(|rules| rules.as_ref())
            .unwrap_or_else(|| self.base.as_ref())
    }

    /// Shared handle to the rules for `category`
    pub fn shared_rules_for(&self, category: &str) -> Arc<EffectiveRules> {
        self.resolved
            .get(category)
            .cloned()
            .unwrap_or_else(|| self.base.clone())
    }

    pub fn final_weights(&self, category: &str) -> &FeatureTable {
        self.rules_for(category).weights()
    }

    pub fn final_tolerances(&self, category: &str) -> &FeatureTable {
        self.rules_for(category).tolerances()
    }

    pub fn custom_similarity(
        &self,
        category: &str,
        feature: &str,
        target: Option<&FeatureValue>,
        candidate: Option<&FeatureValue>,
    ) -> Option<f64> {
        self.rules_for(category)
            .custom_similarity(feature, target, candidate)
    }

    pub fn base_rules(&self) -> &CategoryRuleSet {
        self.base.rules()
    }

    /// Categories with plugin-specific rules, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.resolved.keys().map(|c| c.as_str()).collect();
        categories.sort_unstable();
        categories
    }

    /// Plugin names, highest priority first
    pub fn plugin_names(&self) -> &[String] {
        &self.plugin_names
    }
}
