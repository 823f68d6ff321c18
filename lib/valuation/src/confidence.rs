//! Confidence of a valuation
//!
//! `confidence = min(w1·count + w2·similarity + w3·stability, 1.0)` where
//! `count` saturates at `full_count` anchors, `similarity` is the mean anchor
//! similarity and `stability` rewards a low coefficient of variation of the
//! anchor prices. Stability is only computed from `min_anchors_for_stability`
//! anchors upward; below that dispersion says little.

use crate::stats::{coefficient_of_variation, mean};
use compval_core::{Anchor, Error, Result};
use serde::{Deserialize, Serialize};

fn default_full_count() -> usize {
    10
}

fn default_count_weight() -> f64 {
    0.4
}

fn default_similarity_weight() -> f64 {
    0.4
}

fn default_stability_weight() -> f64 {
    0.2
}

fn default_dispersion_cutoff() -> f64 {
    1.0
}

fn default_stability_gain() -> f64 {
    1.0
}

fn default_min_anchors_for_stability() -> usize {
    3
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceConfig {
    /// Anchor count at which the count component saturates
    #[serde(default = "default_full_count")]
    pub full_count: usize,
    #[serde(default = "default_count_weight")]
    pub count_weight: f64,
    #[serde(default = "default_similarity_weight")]
    pub similarity_weight: f64,
    #[serde(default = "default_stability_weight")]
    pub stability_weight: f64,
    /// Coefficient of variation at which stability reaches zero
    #[serde(default = "default_dispersion_cutoff")]
    pub dispersion_cutoff: f64,
    #[serde(default = "default_stability_gain")]
    pub stability_gain: f64,
    #[serde(default = "default_min_anchors_for_stability")]
    pub min_anchors_for_stability: usize,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            full_count: default_full_count(),
            count_weight: default_count_weight(),
            similarity_weight: default_similarity_weight(),
            stability_weight: default_stability_weight(),
            dispersion_cutoff: default_dispersion_cutoff(),
            stability_gain: default_stability_gain(),
            min_anchors_for_stability: default_min_anchors_for_stability(),
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.full_count == 0 {
            return Err(Error::Configuration(
                "confidence.full_count must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("count_weight", self.count_weight),
            ("similarity_weight", self.similarity_weight),
            ("stability_weight", self.stability_weight),
            ("dispersion_cutoff", self.dispersion_cutoff),
            ("stability_gain", self.stability_gain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Configuration(format!(
                    "confidence.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// The three bounded signals and their combination
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceBreakdown {
    pub count: f64,
    pub similarity: f64,
    pub stability: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfidenceEstimator {
    config: ConfidenceConfig,
}

impl ConfidenceEstimator {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// Confidence in `[0, 1]`; 0 without anchors
    pub fn estimate(&self, anchors: &[Anchor]) -> f64 {
        self.breakdown(anchors).confidence
    }

    pub fn breakdown(&self, anchors: &[Anchor]) -> ConfidenceBreakdown {
        if anchors.is_empty() {
            return ConfidenceBreakdown::default();
        }
        let config = &self.config;

        let count = (anchors.len() as f64 / config.full_count.max(1) as f64).min(1.0);

        let similarities: Vec<f64> = anchors.iter().map(|a| a.similarity).collect();
        let similarity = mean(&similarities).clamp(0.0, 1.0);

        let stability = if anchors.len() >= config.min_anchors_for_stability {
            let prices: Vec<f64> = anchors.iter().map(|a| a.price).collect();
            coefficient_of_variation(&prices)
                .map(|cv| ((config.dispersion_cutoff - cv) * config.stability_gain).max(0.0))
                .unwrap_or(0.0)
        } else {
            0.0
        };

        let combined = config.count_weight * count
            + config.similarity_weight * similarity
            + config.stability_weight * stability;

        ConfidenceBreakdown {
            count,
            similarity,
            stability,
            confidence: if combined.is_finite() { combined.clamp(0.0, 1.0) } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compval_core::{FeatureRecord, MarketRecord};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn anchor(price: f64, similarity: f64) -> Anchor {
        Anchor::from_record(&MarketRecord::new("a", price, FeatureRecord::new("ring")), similarity)
    }

    #[test]
    fn test_no_anchors_zero_confidence() {
        assert_eq!(ConfidenceEstimator::default().estimate(&[]), 0.0);
    }

    #[test]
    fn test_stability_requires_three_anchors() {
        let estimator = ConfidenceEstimator::default();
        let two = vec![anchor(100.0, 1.0), anchor(100.0, 1.0)];
        let breakdown = estimator.breakdown(&two);

        assert_eq!(breakdown.stability, 0.0);
        assert!((breakdown.count - 0.2).abs() < 1e-12);
        assert!((breakdown.confidence - (0.4 * 0.2 + 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_identical_prices_are_stable() {
        let estimator = ConfidenceEstimator::default();
        let anchors: Vec<Anchor> = (0..10).map(|_| anchor(100.0, 1.0)).collect();
        let breakdown = estimator.breakdown(&anchors);

        assert_eq!(breakdown.stability, 1.0);
        assert!((breakdown.confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dispersion_lowers_confidence() {
        let estimator = ConfidenceEstimator::default();
        let tight = vec![anchor(100.0, 0.8), anchor(105.0, 0.8), anchor(95.0, 0.8)];
        let wide = vec![anchor(10.0, 0.8), anchor(500.0, 0.8), anchor(95.0, 0.8)];
        assert!(estimator.estimate(&tight) > estimator.estimate(&wide));
    }

    #[test]
    fn test_stability_gain_not_capped() {
        let estimator = ConfidenceEstimator::new(ConfidenceConfig {
            count_weight: 0.1,
            similarity_weight: 0.1,
            stability_weight: 0.2,
            stability_gain: 2.0,
            ..Default::default()
        });
        let anchors: Vec<Anchor> = (0..10).map(|_| anchor(100.0, 1.0)).collect();
        let breakdown = estimator.breakdown(&anchors);

        assert_eq!(breakdown.stability, 2.0);
        assert!((breakdown.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_capped_at_one() {
        let estimator = ConfidenceEstimator::new(ConfidenceConfig {
            count_weight: 1.0,
            similarity_weight: 1.0,
            stability_weight: 1.0,
            ..Default::default()
        });
        let anchors: Vec<Anchor> = (0..20).map(|_| anchor(100.0, 1.0)).collect();
        assert_eq!(estimator.estimate(&anchors), 1.0);
    }

    #[test]
    fn test_confidence_always_bounded() {
        let estimator = ConfidenceEstimator::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..300 {
            let n = rng.random_range(0..25);
            let anchors: Vec<Anchor> = (0..n)
                .map(|_| anchor(rng.random_range(0.0..5000.0), rng.random_range(0.0..=1.0)))
                .collect();
            let c = estimator.estimate(&anchors);
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(ConfidenceConfig::default().validate().is_ok());
        let bad = ConfidenceConfig {
            full_count: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
