//! # compval Similarity
//!
//! Rule-driven similarity scoring and anchor selection.
//!
//! ## Features
//!
//! - **Decision-table comparison**: numeric, list and discrete feature values,
//!   each branch a named case with its own score
//! - **Weighted scoring**: per-category weights and tolerances from a
//!   [`compval_rules::RuleRegistry`], with plugin comparators taking precedence
//! - **Anchor selection**: threshold, self-exclusion, malformed-record skipping,
//!   bounded top-k ranking
//! - **Explainability**: per-feature similarity and weight for any pair
//!
//! ## Example
//!
//! ```rust
//! use compval_core::{FeatureRecord, MarketRecord, ValuationTarget};
//! use compval_rules::{CategoryRuleSet, RuleRegistry};
//! use compval_similarity::{AnchorSelector, SimilarityScorer};
//!
//! let base = CategoryRuleSet::new()
//!     .weight("level", 1.0)
//!     .weight("damage", 4.0)
//!     .tolerance("level", 0.25)
//!     .tolerance("damage", 0.25);
//! let registry = RuleRegistry::base_only(base).unwrap();
//! let scorer = SimilarityScorer::default();
//! let selector = AnchorSelector::new(&registry, &scorer);
//!
//! let target = ValuationTarget::new(
//!     FeatureRecord::new("sword").with("level", 100.0).with("damage", 50.0),
//! );
//! let candidates = vec![
//!     MarketRecord::new("a", 900.0, FeatureRecord::new("sword").with("level", 100.0).with("damage", 52.0)),
//!     MarketRecord::new("b", 4000.0, FeatureRecord::new("sword").with("level", 100.0).with("damage", 200.0)),
//! ];
//!
//! let anchors = selector.find_anchors(&target, &candidates, 0.5, 10, "sword");
//! assert_eq!(anchors.len(), 1);
//! assert_eq!(anchors[0].id.to_string(), "a");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────>│   Scorer    │────>│  Selector   │
//! │ (rules)     │     │ (pairwise)  │     │ (top-k)     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Explain    │
//!                     │ (breakdown) │
//!                     └─────────────┘
//! ```

pub mod anchors;
pub mod compare;
pub mod config;
pub mod explain;
pub mod scorer;

// Re-export main types for convenience
pub use anchors::{AnchorSelection, AnchorSelector, SelectionStats};
pub use compare::{compare, number_similarity, Case, FeatureRule, ToleranceBand};
pub use config::SimilarityConfig;
pub use explain::{FeatureContribution, ScoreBreakdown};
pub use scorer::SimilarityScorer;
