//! Price aggregation strategies
//!
//! - `competitive`: low percentile of anchor prices, discounted
//! - `premium`: high percentile, damped below the raw figure
//! - `fair_value` (default): similarity-weighted median, damped toward
//!   realized transaction prices
//!
//! The percentiles and multipliers are calibration parameters.

use crate::stats::{percentile, round_to, weighted_median};
use compval_core::{Anchor, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStrategy {
    Competitive,
    Premium,
    #[default]
    FairValue,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pricing strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl PriceStrategy {
    pub const ALL: [PriceStrategy; 3] = [
        PriceStrategy::Competitive,
        PriceStrategy::Premium,
        PriceStrategy::FairValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceStrategy::Competitive => "competitive",
            PriceStrategy::Premium => "premium",
            PriceStrategy::FairValue => "fair_value",
        }
    }

    /// Lenient lookup: unknown names fall back to `fair_value`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: UnknownStrategy| {
            tracing::debug!(error = %e, "falling back to fair_value");
            PriceStrategy::FairValue
        })
    }
}

impl FromStr for PriceStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "competitive" => Ok(PriceStrategy::Competitive),
            "premium" => Ok(PriceStrategy::Premium),
            "fair_value" | "fair" => Ok(PriceStrategy::FairValue),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for PriceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_competitive_percentile() -> f64 {
    25.0
}

fn default_competitive_discount() -> f64 {
    0.9
}

fn default_premium_percentile() -> f64 {
    75.0
}

fn default_premium_discount() -> f64 {
    0.85
}

fn default_fair_value_damping() -> f64 {
    0.9
}

fn default_currency_decimals() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    #[serde(default = "default_competitive_percentile")]
    pub competitive_percentile: f64,
    #[serde(default = "default_competitive_discount")]
    pub competitive_discount: f64,
    #[serde(default = "default_premium_percentile")]
    pub premium_percentile: f64,
    #[serde(default = "default_premium_discount")]
    pub premium_discount: f64,
    #[serde(default = "default_fair_value_damping")]
    pub fair_value_damping: f64,
    /// Decimal places of the caller's currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            competitive_percentile: default_competitive_percentile(),
            competitive_discount: default_competitive_discount(),
            premium_percentile: default_premium_percentile(),
            premium_discount: default_premium_discount(),
            fair_value_damping: default_fair_value_damping(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("competitive_percentile", self.competitive_percentile),
            ("premium_percentile", self.premium_percentile),
        ] {
            if !(0.0..=100.0).contains(&p) {
                return Err(Error::Configuration(format!(
                    "pricing.{} must be within [0, 100], got {}",
                    name, p
                )));
            }
        }
        for (name, factor) in [
            ("competitive_discount", self.competitive_discount),
            ("premium_discount", self.premium_discount),
            ("fair_value_damping", self.fair_value_damping),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(Error::Configuration(format!(
                    "pricing.{} must be a non-negative number, got {}",
                    name, factor
                )));
            }
        }
        if self.currency_decimals > 8 {
            return Err(Error::Configuration(format!(
                "pricing.currency_decimals must be at most 8, got {}",
                self.currency_decimals
            )));
        }
        Ok(())
    }
}

/// Turns anchor prices into one estimate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceAggregator {
    config: PricingConfig,
}

impl PriceAggregator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Estimated price, rounded to the currency precision and never negative.
    /// An empty anchor list yields 0.0.
    pub fn aggregate(&self, anchors: &[Anchor], strategy: PriceStrategy) -> f64 {
        if anchors.is_empty() {
            return 0.0;
        }
        let prices: Vec<f64> = anchors.iter().map(|a| a.price).collect();
        let raw = self.raw_estimate(&prices, anchors, strategy);
        round_to(raw.max(0.0), self.config.currency_decimals)
    }

    fn raw_estimate(&self, prices: &[f64], anchors: &[Anchor], strategy: PriceStrategy) -> f64 {
        match strategy {
            PriceStrategy::Competitive => {
                percentile(prices, self.config.competitive_percentile)
                    * self.config.competitive_discount
            }
            PriceStrategy::Premium => {
                percentile(prices, self.config.premium_percentile) * self.config.premium_discount
            }
            PriceStrategy::FairValue => {
                let weights: Vec<f64> = anchors.iter().map(|a| a.similarity).collect();
                weighted_median(prices, &weights) * self.config.fair_value_damping
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compval_core::{FeatureRecord, MarketRecord};

    fn anchors(prices: &[f64], similarities: &[f64]) -> Vec<Anchor> {
        prices
            .iter()
            .zip(similarities)
            .enumerate()
            .map(|(i, (price, sim))| {
                let record = MarketRecord::new(i as u64, *price, FeatureRecord::new("ring"));
                Anchor::from_record(&record, *sim)
            })
            .collect()
    }

    #[test]
    fn test_fair_value_weighted_median_damped() {
        let aggregator = PriceAggregator::default();
        let list = anchors(&[100.0, 200.0, 300.0], &[0.9, 0.8, 0.5]);
        assert_eq!(aggregator.aggregate(&list, PriceStrategy::FairValue), 180.0);
    }

    #[test]
    fn test_fair_value_undamped() {
        let aggregator = PriceAggregator::new(PricingConfig {
            fair_value_damping: 1.0,
            ..Default::default()
        });
        let list = anchors(&[100.0, 200.0, 300.0], &[0.9, 0.8, 0.5]);
        assert_eq!(aggregator.aggregate(&list, PriceStrategy::FairValue), 200.0);
    }

    #[test]
    fn test_competitive_percentile() {
        let aggregator = PriceAggregator::default();
        let list = anchors(&[100.0, 150.0, 200.0, 250.0, 1000.0], &[0.9; 5]);
        assert_eq!(aggregator.aggregate(&list, PriceStrategy::Competitive), 135.0);
    }

    #[test]
    fn test_premium_percentile() {
        let aggregator = PriceAggregator::default();
        let list = anchors(&[100.0, 150.0, 200.0, 250.0, 1000.0], &[0.9; 5]);
        assert_eq!(aggregator.aggregate(&list, PriceStrategy::Premium), 212.5);
    }

    #[test]
    fn test_strategies_are_ordered() {
        let aggregator = PriceAggregator::new(PricingConfig {
            competitive_discount: 1.0,
            premium_discount: 1.0,
            fair_value_damping: 1.0,
            ..Default::default()
        });
        let list = anchors(&[10.0, 20.0, 30.0, 40.0, 50.0], &[0.5; 5]);
        let low = aggregator.aggregate(&list, PriceStrategy::Competitive);
        let mid = aggregator.aggregate(&list, PriceStrategy::FairValue);
        let high = aggregator.aggregate(&list, PriceStrategy::Premium);
        assert!(low <= mid && mid <= high);
    }

    #[test]
    fn test_empty_anchors() {
        assert_eq!(PriceAggregator::default().aggregate(&[], PriceStrategy::Premium), 0.0);
    }

    #[test]
    fn test_currency_rounding() {
        let aggregator = PriceAggregator::new(PricingConfig {
            fair_value_damping: 1.0 / 3.0,
            currency_decimals: 2,
            ..Default::default()
        });
        let list = anchors(&[100.0], &[1.0]);
        assert_eq!(aggregator.aggregate(&list, PriceStrategy::FairValue), 33.33);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("premium".parse::<PriceStrategy>(), Ok(PriceStrategy::Premium));
        assert_eq!("Fair-Value".parse::<PriceStrategy>(), Ok(PriceStrategy::FairValue));
        assert!("cheapest".parse::<PriceStrategy>().is_err());
        assert_eq!(PriceStrategy::from_name("cheapest"), PriceStrategy::FairValue);
        assert_eq!(PriceStrategy::from_name("competitive"), PriceStrategy::Competitive);
    }

    #[test]
    fn test_strategy_serde_names() {
        for strategy in PriceStrategy::ALL {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(PricingConfig::default().validate().is_ok());
        let bad = PricingConfig {
            premium_percentile: 140.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = PricingConfig {
            fair_value_damping: -0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_huge_prices_stay_finite() {
        let aggregator = PriceAggregator::default();
        let list = anchors(&[1e307, 1e307, 1e307], &[0.9, 0.8, 0.5]);
        let estimate = aggregator.aggregate(&list, PriceStrategy::FairValue);

        assert!(estimate.is_finite());
        assert!((estimate - 9e306).abs() / 9e306 < 1e-12);
        assert!(serde_json::to_value(estimate).unwrap().is_number());
    }
}
