//! Engine configuration file
//!
//! A single JSON document; every section and field is optional.
//!
//! ```json
//! {
//!   "similarity": { "asymmetric_zero_credit": 0.3, "unmatched_default": 0.5 },
//!   "pricing": { "fair_value_damping": 0.9, "currency_decimals": 2 },
//!   "confidence": { "full_count": 10 },
//!   "defaults": { "strategy": "fair_value", "threshold": 0.6, "max_anchors": 30 },
//!   "rules": { "base": { "weights": { "level": 1.0 } }, "plugins": [] }
//! }
//! ```

use crate::confidence::ConfidenceConfig;
use crate::pricing::{PriceStrategy, PricingConfig};
use compval_core::{Error, Result};
use compval_rules::{RuleRegistry, RulesConfig};
use compval_similarity::SimilarityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_threshold() -> f64 {
    0.6
}

fn default_max_anchors() -> usize {
    30
}

fn default_report_anchors() -> usize {
    10
}

/// Parameters used when a caller does not pass its own
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValuationDefaults {
    #[serde(default)]
    pub strategy: PriceStrategy,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_anchors")]
    pub max_anchors: usize,
    /// How many of the best anchors a result lists
    #[serde(default = "default_report_anchors")]
    pub report_anchors: usize,
}

impl Default for ValuationDefaults {
    fn default() -> Self {
        Self {
            strategy: PriceStrategy::default(),
            threshold: default_threshold(),
            max_anchors: default_max_anchors(),
            report_anchors: default_report_anchors(),
        }
    }
}

impl ValuationDefaults {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Configuration(format!(
                "defaults.threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.max_anchors == 0 {
            return Err(Error::Configuration(
                "defaults.max_anchors must be at least 1".to_string(),
            ));
        }
        if self.report_anchors == 0 {
            return Err(Error::Configuration(
                "defaults.report_anchors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub defaults: ValuationDefaults,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(raw)
            .map_err(|e| Error::Configuration(format!("invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Validate every numeric section; rules are validated by [`EngineConfig::build_registry`]
    pub fn validate(&self) -> Result<()> {
        self.similarity.validate()?;
        self.pricing.validate()?;
        self.confidence.validate()?;
        self.defaults.validate()
    }

    pub fn build_registry(&self) -> Result<RuleRegistry> {
        self.rules.build_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.defaults.threshold, 0.6);
        assert_eq!(config.pricing.currency_decimals, 2);
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "pricing": {{ "fair_value_damping": 0.8 }},
                "defaults": {{ "strategy": "premium", "max_anchors": 5 }},
                "rules": {{ "builtin_plugins": false }}
            }}"#
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pricing.fair_value_damping, 0.8);
        assert_eq!(config.defaults.strategy, PriceStrategy::Premium);
        assert_eq!(config.defaults.max_anchors, 5);
        assert!(config.build_registry().unwrap().plugin_names().is_empty());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"defaults": {"threshold": 2.0}}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"confidence": {"full_count": 0}}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"defaults": {"report_anchors": 0}}"#).is_err());
        assert!(
            EngineConfig::from_json_str(r#"{"similarity": {"unmatched_default": -1}}"#).is_err()
        );
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::from_file("/nonexistent/compval.json"),
            Err(Error::Io(_))
        ));
    }
}
