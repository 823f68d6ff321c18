//! Anchor selection
//!
//! Scores every candidate against the target, drops malformed records, the
//! target's own listing and anything below the similarity threshold, and keeps
//! the `max_anchors` most similar candidates, best first.

use crate::explain::ScoreBreakdown;
use crate::scorer::SimilarityScorer;
use compval_core::{Anchor, MarketRecord, ValuationTarget};
use compval_rules::RuleRegistry;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Counters describing one selection pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionStats {
    /// Candidates supplied
    pub scanned: usize,
    /// Malformed candidates skipped
    pub skipped: usize,
    /// Candidates sharing the target's id
    pub self_excluded: usize,
    /// Candidates scoring below the threshold
    pub below_threshold: usize,
    /// Candidates at or above the threshold, before truncation
    pub retained: usize,
}

/// Anchors plus the counters of the pass that produced them
#[derive(Debug, Clone, Default)]
pub struct AnchorSelection {
    pub anchors: Vec<Anchor>,
    pub stats: SelectionStats,
}

// Greater is better: higher similarity, then earlier position in the input
type RankKey = (OrderedFloat<f64>, Reverse<usize>);

/// Finds comparable market records for a target under a registry's rules
#[derive(Debug, Clone, Copy)]
pub struct AnchorSelector<'a> {
    registry: &'a RuleRegistry,
    scorer: &'a SimilarityScorer,
}

impl<'a> AnchorSelector<'a> {
    pub fn new(registry: &'a RuleRegistry, scorer: &'a SimilarityScorer) -> Self {
        Self { registry, scorer }
    }

    /// Ordered anchors, most similar first; never fails, possibly empty
    pub fn find_anchors(
        &self,
        target: &ValuationTarget,
        candidates: &[MarketRecord],
        threshold: f64,
        max_anchors: usize,
        category: &str,
    ) -> Vec<Anchor> {
        self.select(target, candidates, threshold, max_anchors, category)
            .anchors
    }

    /// Like [`AnchorSelector::find_anchors`], also reporting selection counters.
    ///
    /// `threshold` is clamped to `[0, 1]` (NaN counts as 0) and `max_anchors`
    /// is raised to at least 1.
    pub fn select(
        &self,
        target: &ValuationTarget,
        candidates: &[MarketRecord],
        threshold: f64,
        max_anchors: usize,
        category: &str,
    ) -> AnchorSelection {
        let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
        let max_anchors = max_anchors.max(1);
        let rules = self.registry.rules_for(category);
        let target_features = rules.enrich(&target.record);

        let mut stats = SelectionStats {
            scanned: candidates.len(),
            ..Default::default()
        };
        let mut best: BinaryHeap<Reverse<RankKey>> = BinaryHeap::with_capacity(max_anchors + 1);

        for (index, candidate) in candidates.iter().enumerate() {
            if target.id.as_ref() == Some(&candidate.id) {
                stats.self_excluded += 1;
                continue;
            }
            if let Err(e) = candidate.validate() {
                stats.skipped += 1;
                tracing::warn!(id = %candidate.id, error = %e, "skipping malformed candidate");
                continue;
            }

            let features = rules.enrich(&candidate.record);
            let similarity = self.scorer.score_enriched(rules, &target_features, &features);
            if similarity < threshold {
                stats.below_threshold += 1;
                continue;
            }

            stats.retained += 1;
            best.push(Reverse((OrderedFloat(similarity), Reverse(index))));
            if best.len() > max_anchors {
                best.pop();
            }
        }

        // into_sorted_vec is ascending in Reverse, i.e. best first
        let anchors: Vec<Anchor> = best
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse((similarity, Reverse(index)))| {
                Anchor::from_record(&candidates[index], similarity.into_inner())
            })
            .collect();

        tracing::debug!(
            category,
            threshold,
            scanned = stats.scanned,
            skipped = stats.skipped,
            self_excluded = stats.self_excluded,
            below_threshold = stats.below_threshold,
            retained = stats.retained,
            anchors = anchors.len(),
            "anchor selection finished"
        );

        AnchorSelection { anchors, stats }
    }

    /// Per-feature explanation of one candidate's score against the target
    pub fn explain(
        &self,
        target: &ValuationTarget,
        candidate: &MarketRecord,
        category: &str,
    ) -> ScoreBreakdown {
        let rules = self.registry.rules_for(category);
        self.scorer.explain(rules, &target.record, &candidate.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compval_core::FeatureRecord;
    use compval_rules::CategoryRuleSet;

    fn registry() -> RuleRegistry {
        let base = CategoryRuleSet::new()
            .weight("level", 1.0)
            .weight("damage", 4.0)
            .tolerance("level", 0.25)
            .tolerance("damage", 0.25);
        RuleRegistry::base_only(base).unwrap()
    }

    fn listing(id: &str, price: f64, damage: f64) -> MarketRecord {
        MarketRecord::new(
            id,
            price,
            FeatureRecord::new("sword").with("level", 100.0).with("damage", damage),
        )
    }

    fn target() -> ValuationTarget {
        ValuationTarget::new(FeatureRecord::new("sword").with("level", 100.0).with("damage", 50.0))
    }

    #[test]
    fn test_empty_candidates() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let selection = selector.select(&target(), &[], 0.5, 10, "sword");
        assert!(selection.anchors.is_empty());
        assert_eq!(selection.stats, SelectionStats::default());
    }

    #[test]
    fn test_sorted_and_truncated() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![
            listing("far", 10.0, 70.0),
            listing("exact", 20.0, 50.0),
            listing("near", 30.0, 68.0),
            listing("close", 40.0, 52.0),
        ];
        let selection = selector.select(&target(), &candidates, 0.0, 3, "sword");
        let ids: Vec<String> = selection.anchors.iter().map(|a| a.id.to_string()).collect();

        // exact and close both score 1.0; input order breaks the tie
        assert_eq!(ids, vec!["exact", "close", "near"]);
        assert_eq!(selection.stats.retained, 4);
        assert!(selection
            .anchors
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_threshold_filters() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![listing("a", 10.0, 50.0), listing("b", 10.0, 200.0)];
        let anchors = selector.find_anchors(&target(), &candidates, 0.5, 10, "sword");

        assert_eq!(anchors.len(), 1);
        assert!(anchors.iter().all(|a| a.similarity >= 0.5));
    }

    #[test]
    fn test_self_exclusion() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![listing("me", 10.0, 50.0), listing("other", 12.0, 50.0)];
        let selection = selector.select(&target().with_id("me"), &candidates, 0.0, 10, "sword");

        assert_eq!(selection.anchors.len(), 1);
        assert_eq!(selection.anchors[0].id.to_string(), "other");
        assert_eq!(selection.stats.self_excluded, 1);
    }

    #[test]
    fn test_malformed_candidates_skipped() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![
            listing("neg", -1.0, 50.0),
            listing("nan", 10.0, f64::NAN),
            listing("ok", 10.0, 50.0),
        ];
        let selection = selector.select(&target(), &candidates, 0.0, 10, "sword");

        assert_eq!(selection.anchors.len(), 1);
        assert_eq!(selection.stats.skipped, 2);
        assert_eq!(selection.stats.scanned, 3);
    }

    #[test]
    fn test_zero_max_anchors_keeps_one() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![listing("a", 10.0, 50.0), listing("b", 10.0, 51.0)];
        assert_eq!(selector.find_anchors(&target(), &candidates, 0.0, 0, "sword").len(), 1);
    }

    #[test]
    fn test_out_of_range_threshold_clamped() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let candidates = vec![listing("a", 10.0, 50.0)];
        assert_eq!(selector.find_anchors(&target(), &candidates, 7.0, 5, "sword").len(), 1);
        assert_eq!(selector.find_anchors(&target(), &candidates, f64::NAN, 5, "sword").len(), 1);
    }

    #[test]
    fn test_explain_candidate() {
        let registry = registry();
        let scorer = SimilarityScorer::default();
        let selector = AnchorSelector::new(&registry, &scorer);

        let breakdown = selector.explain(&target(), &listing("b", 10.0, 200.0), "sword");
        assert_eq!(breakdown.largest_shortfall().unwrap().feature, "damage");
    }
}
