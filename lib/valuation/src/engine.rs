//! Valuation orchestrator
//!
//! Runs anchor selection, price aggregation and confidence estimation for one
//! target or a batch of them. Only the rule registry outlives a call; it is
//! shared read-only between threads.

use crate::config::{EngineConfig, ValuationDefaults};
use crate::confidence::ConfidenceEstimator;
use crate::pricing::{PriceAggregator, PriceStrategy};
use crate::result::ValuationResult;
use compval_core::{MarketDataSource, MarketRecord, Result, ValuationTarget};
use compval_rules::RuleRegistry;
use compval_similarity::{AnchorSelector, ScoreBreakdown, SelectionStats, SimilarityScorer};
use rayon::prelude::*;
use std::sync::Arc;

pub struct ValuationEngine<S: MarketDataSource> {
    registry: Arc<RuleRegistry>,
    source: S,
    scorer: SimilarityScorer,
    aggregator: PriceAggregator,
    confidence: ConfidenceEstimator,
    defaults: ValuationDefaults,
}

impl<S: MarketDataSource> ValuationEngine<S> {
    /// Engine with default calibration
    pub fn new(registry: Arc<RuleRegistry>, source: S) -> Self {
        Self {
            registry,
            source,
            scorer: SimilarityScorer::default(),
            aggregator: PriceAggregator::default(),
            confidence: ConfidenceEstimator::default(),
            defaults: ValuationDefaults::default(),
        }
    }

    /// Validate `config`, build its registry and wire every component
    pub fn from_config(config: &EngineConfig, source: S) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(config.build_registry()?);
        Ok(Self {
            registry,
            source,
            scorer: SimilarityScorer::new(config.similarity),
            aggregator: PriceAggregator::new(config.pricing),
            confidence: ConfidenceEstimator::new(config.confidence),
            defaults: config.defaults,
        })
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: ValuationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &ValuationDefaults {
        &self.defaults
    }

    fn selector(&self) -> AnchorSelector<'_> {
        AnchorSelector::new(&self.registry, &self.scorer)
    }

    /// Value one target against the candidates the market source supplies.
    ///
    /// Never fails: an unavailable source, a malformed target or an empty
    /// anchor set all come back as `success: false`.
    pub fn calculate_value(
        &self,
        target: &ValuationTarget,
        strategy: &str,
        threshold: f64,
        max_anchors: usize,
    ) -> ValuationResult {
        let strategy = PriceStrategy::from_name(strategy);
        match self.source.candidates(target) {
            Ok(candidates) => {
                self.value_with(target, &candidates, strategy, threshold, max_anchors)
            }
            Err(e) => {
                tracing::warn!(category = target.category(), error = %e, "market data unavailable");
                ValuationResult::failure(strategy, e.to_string(), SelectionStats::default())
            }
        }
    }

    /// [`ValuationEngine::calculate_value`] with the configured threshold and anchor limit
    pub fn value(&self, target: &ValuationTarget, strategy: &str) -> ValuationResult {
        self.calculate_value(target, strategy, self.defaults.threshold, self.defaults.max_anchors)
    }

    /// Value a target against an explicit candidate snapshot, bypassing the source
    pub fn value_against(
        &self,
        target: &ValuationTarget,
        candidates: &[MarketRecord],
        strategy: &str,
        threshold: f64,
        max_anchors: usize,
    ) -> ValuationResult {
        self.value_with(
            target,
            candidates,
            PriceStrategy::from_name(strategy),
            threshold,
            max_anchors,
        )
    }

    fn value_with(
        &self,
        target: &ValuationTarget,
        candidates: &[MarketRecord],
        strategy: PriceStrategy,
        threshold: f64,
        max_anchors: usize,
    ) -> ValuationResult {
        if let Err(e) = target.validate() {
            return ValuationResult::failure(strategy, e.to_string(), SelectionStats::default());
        }

        let selection = self
            .selector()
            .select(target, candidates, threshold, max_anchors, target.category());
        if selection.anchors.is_empty() {
            return ValuationResult::no_anchors(strategy, selection.stats);
        }

        let price = self.aggregator.aggregate(&selection.anchors, strategy);
        let confidence = self.confidence.estimate(&selection.anchors);

        tracing::debug!(
            category = target.category(),
            strategy = %strategy,
            anchors = selection.anchors.len(),
            price,
            confidence,
            "valuation finished"
        );

        ValuationResult::priced(
            price,
            confidence,
            strategy,
            &selection.anchors,
            self.defaults.report_anchors,
            selection.stats,
        )
    }

    /// Value many targets in parallel with the configured threshold and anchor
    /// limit. Results keep input order; a failing target never aborts the batch.
    pub fn batch_valuation(
        &self,
        targets: &[ValuationTarget],
        strategy: &str,
    ) -> Vec<ValuationResult> {
        let results: Vec<ValuationResult> = targets
            .par_iter()
            .map(|target| self.value(target, strategy))
            .collect();

        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "batch valuation finished"
        );
        results
    }

    /// Per-feature explanation of a candidate's similarity to a target
    pub fn explain(&self, target: &ValuationTarget, candidate: &MarketRecord) -> ScoreBreakdown {
        self.selector().explain(target, candidate, target.category())
    }
}
