use crate::pricing::PriceStrategy;
use compval_core::{Anchor, AnchorSummary};
use compval_similarity::SelectionStats;
use serde::{Deserialize, Serialize};

pub const NO_ANCHORS_FOUND: &str = "no comparable anchors found";

/// Outcome of one valuation.
///
/// Business conditions (no anchors, malformed target, unavailable market
/// data) are reported with `success: false` and an `error` message rather
/// than as a Rust error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationResult {
    pub success: bool,
    pub estimated_price: f64,
    pub confidence: f64,
    /// Anchors used for pricing (not just the reported ones)
    pub anchor_count: usize,
    pub strategy_used: PriceStrategy,
    /// Most similar anchors, best first, for inspection
    pub anchors: Vec<AnchorSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub stats: SelectionStats,
}

impl ValuationResult {
    pub fn priced(
        estimated_price: f64,
        confidence: f64,
        strategy: PriceStrategy,
        anchors: &[Anchor],
        report_anchors: usize,
        stats: SelectionStats,
    ) -> Self {
        Self {
            success: true,
            estimated_price: estimated_price.max(0.0),
            confidence: confidence.clamp(0.0, 1.0),
            anchor_count: anchors.len(),
            strategy_used: strategy,
            anchors: anchors.iter().take(report_anchors).map(Anchor::summary).collect(),
            error: None,
            stats,
        }
    }

    pub fn failure(
        strategy: PriceStrategy,
        error: impl Into<String>,
        stats: SelectionStats,
    ) -> Self {
        Self {
            success: false,
            estimated_price: 0.0,
            confidence: 0.0,
            anchor_count: 0,
            strategy_used: strategy,
            anchors: Vec::new(),
            error: Some(error.into()),
            stats,
        }
    }

    pub fn no_anchors(strategy: PriceStrategy, stats: SelectionStats) -> Self {
        Self::failure(strategy, NO_ANCHORS_FOUND, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compval_core::{FeatureRecord, MarketRecord};

    #[test]
    fn test_failure_shape() {
        let result =
            ValuationResult::no_anchors(PriceStrategy::FairValue, SelectionStats::default());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["estimated_price"], 0.0);
        assert_eq!(json["confidence"], 0.0);
        assert_eq!(json["anchor_count"], 0);
        assert_eq!(json["strategy_used"], "fair_value");
        assert_eq!(json["error"], NO_ANCHORS_FOUND);
    }

    #[test]
    fn test_priced_reports_top_anchors() {
        let anchors: Vec<Anchor> = (0..8u64)
            .map(|i| {
                let record = MarketRecord::new(i, 10.0, FeatureRecord::new("ring"));
                Anchor::from_record(&record, 1.0 - i as f64 * 0.1)
            })
            .collect();
        let stats = SelectionStats::default();
        let result = ValuationResult::priced(9.0, 0.7, PriceStrategy::Premium, &anchors, 5, stats);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(result.anchor_count, 8);
        assert_eq!(result.anchors.len(), 5);
        assert!(json.get("error").is_none());
        assert_eq!(json["anchors"][0]["id"], 0);
    }
}
