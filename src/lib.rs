//! # compval
//!
//! Comparable-sales valuation for catalog items described by loose feature sets.
//!
//! Given a target item and a snapshot of priced market listings, compval finds
//! the most similar listings ("anchors") under category-specific weighting
//! rules, aggregates their prices with a chosen strategy and reports how much
//! the estimate can be trusted.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! compval value --target item.json --candidates market.json --strategy premium
//! compval batch --targets items.json --candidates market.json --log-level debug
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use compval::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(RuleRegistry::with_defaults()?);
//! let market = InMemoryMarket::new(vec![
//!     MarketRecord::new(1u64, 250.0, FeatureRecord::new("sword").with("level", 60.0).with("damage", 120.0)),
//!     MarketRecord::new(2u64, 270.0, FeatureRecord::new("sword").with("level", 62.0).with("damage", 125.0)),
//! ]);
//! let engine = ValuationEngine::new(registry, market);
//!
//! let target = ValuationTarget::new(FeatureRecord::new("sword").with("level", 61.0).with("damage", 122.0));
//! let result = engine.calculate_value(&target, "fair_value", 0.6, 30);
//! assert!(result.success);
//! # Ok::<(), compval::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`compval-core`](https://docs.rs/compval-core) - Records, anchors, errors, market data sources
//! - [`compval-rules`](https://docs.rs/compval-rules) - Category rule registry and plugins
//! - [`compval-similarity`](https://docs.rs/compval-similarity) - Similarity scoring and anchor selection
//! - [`compval-valuation`](https://docs.rs/compval-valuation) - Pricing, confidence and orchestration

// Re-export core types
pub use compval_core::{
    Anchor, AnchorSummary, CandidateFilter, Error, FeatureRecord, FeatureValue, Filter,
    FilterCondition, InMemoryMarket, MarketDataSource, MarketRecord, PrimaryRange, RecordId,
    Result, ValuationTarget,
};

// Re-export rules
pub use compval_rules::{
    CategoryPlugin, CategoryRuleSet, DeclarativePlugin, EffectiveRules, RuleRegistry, RulesConfig,
};

// Re-export similarity
pub use compval_similarity::{
    AnchorSelector, ScoreBreakdown, SelectionStats, SimilarityConfig, SimilarityScorer,
};

// Re-export valuation
pub use compval_valuation::{
    ConfidenceEstimator, EngineConfig, PriceAggregator, PriceStrategy, ValuationDefaults,
    ValuationEngine, ValuationResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Anchor, AnchorSelector, CategoryPlugin, CategoryRuleSet, EngineConfig, Error,
        FeatureRecord, FeatureValue, InMemoryMarket, MarketDataSource, MarketRecord,
        PriceStrategy, RecordId, Result, RuleRegistry, SimilarityScorer, ValuationEngine,
        ValuationResult, ValuationTarget,
    };
}

/// Built-in category plugins
pub mod plugins {
    pub use compval_rules::plugins::{
        builtin_plugins, CompanionPlugin, EquipmentPlugin, JewelryPlugin,
    };
}
