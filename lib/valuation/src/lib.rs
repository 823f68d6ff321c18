//! # compval-valuation
//!
//! Turns the anchors found for a target into a price and a confidence score.
//!
//! ```rust,no_run
//! use compval_core::{FeatureRecord, InMemoryMarket, MarketRecord, ValuationTarget};
//! use compval_rules::RuleRegistry;
//! use compval_valuation::ValuationEngine;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(RuleRegistry::with_defaults()?);
//! let market = InMemoryMarket::new(vec![MarketRecord::new(
//!     "listing-1",
//!     120.0,
//!     FeatureRecord::new("ring").with("level", 40.0),
//! )]);
//! let engine = ValuationEngine::new(registry, market);
//!
//! let target = ValuationTarget::new(FeatureRecord::new("ring").with("level", 42.0));
//! let result = engine.calculate_value(&target, "fair_value", 0.6, 30);
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod confidence;
pub mod config;
pub mod engine;
pub mod pricing;
pub mod result;
pub mod stats;

pub use confidence::{ConfidenceBreakdown, ConfidenceConfig, ConfidenceEstimator};
pub use config::{EngineConfig, ValuationDefaults};
pub use engine::ValuationEngine;
pub use pricing::{PriceAggregator, PriceStrategy, PricingConfig, UnknownStrategy};
pub use result::{ValuationResult, NO_ANCHORS_FOUND};
