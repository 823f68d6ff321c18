//! Weighted similarity between two feature records
//!
//! `similarity = Σ(weight_i · similarity_i) / Σ(weight_i)` over every feature
//! with a positive weight that is present on at least one side. A plugin
//! comparator, when one answers for a feature, replaces the default
//! comparison for that feature.

use crate::compare::{compare, FeatureRule};
use crate::config::SimilarityConfig;
use crate::explain::{FeatureContribution, ScoreBreakdown};
use compval_core::{FeatureRecord, FeatureValue};
use compval_rules::EffectiveRules;

/// Pure, deterministic similarity function parameterized by calibration constants
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarityScorer {
    config: SimilarityConfig,
}

impl SimilarityScorer {
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Similarity in `[0, 1]` between raw (not yet enriched) records
    pub fn score(
        &self,
        rules: &EffectiveRules,
        target: &FeatureRecord,
        candidate: &FeatureRecord,
    ) -> f64 {
        let target = rules.enrich(target);
        let candidate = rules.enrich(candidate);
        self.score_enriched(rules, &target, &candidate)
    }

    /// Similarity between records that already carry their derived features
    pub fn score_enriched(
        &self,
        rules: &EffectiveRules,
        target: &FeatureRecord,
        candidate: &FeatureRecord,
    ) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for (feature, &weight) in rules.weights() {
            if weight <= 0.0 {
                continue;
            }
            let (t, c) = (target.get(feature), candidate.get(feature));
            if t.is_none() && c.is_none() {
                continue;
            }
            weighted += weight * self.feature_similarity(rules, feature, t, c);
            total_weight += weight;
        }

        if total_weight <= 0.0 {
            return 0.0;
        }
        (weighted / total_weight).clamp(0.0, 1.0)
    }

    /// Similarity of a single feature: plugin comparator first, then the
    /// default decision table
    pub fn feature_similarity(
        &self,
        rules: &EffectiveRules,
        feature: &str,
        target: Option<&FeatureValue>,
        candidate: Option<&FeatureValue>,
    ) -> f64 {
        if let Some(similarity) = rules.custom_similarity(feature, target, candidate) {
            return similarity;
        }
        let rule = FeatureRule {
            tolerance: rules
                .rules()
                .tolerance_of(feature)
                .unwrap_or(self.config.default_tolerance),
            exact: rules.rules().is_exact(feature),
        };
        compare(target, candidate, &rule, &self.config)
    }

    /// Same computation as [`SimilarityScorer::score`], with the per-feature breakdown
    pub fn explain(
        &self,
        rules: &EffectiveRules,
        target: &FeatureRecord,
        candidate: &FeatureRecord,
    ) -> ScoreBreakdown {
        let target = rules.enrich(target);
        let candidate = rules.enrich(candidate);

        let mut features = Vec::new();
        for (feature, &weight) in rules.weights() {
            if weight <= 0.0 {
                continue;
            }
            let (t, c) = (target.get(feature), candidate.get(feature));
            if t.is_none() && c.is_none() {
                continue;
            }
            let similarity = self.feature_similarity(rules, feature, t, c);
            features.push(FeatureContribution {
                feature: feature.clone(),
                similarity,
                weight,
            });
        }

        ScoreBreakdown::from_contributions(features)
    }
}
