//! # compval Core
//!
//! Core data model for the compval comparable-based valuation engine.
//!
//! - [`FeatureRecord`] - Extracted feature set of one item, tagged with its category
//! - [`MarketRecord`] - An already-priced market listing (features + id + price)
//! - [`ValuationTarget`] - The item being priced
//! - [`Anchor`] - A market record selected as a comparable, with its similarity
//! - [`MarketDataSource`] - Collaborator that supplies pre-filtered candidates
//!
//! ## Example
//!
//! ```rust
//! use compval_core::{FeatureRecord, MarketRecord, ValuationTarget};
//!
//! let target = ValuationTarget::new(
//!     FeatureRecord::new("sword").with("level", 100.0).with("damage", 50.0),
//! );
//! let listing = MarketRecord::new(
//!     "listing-1",
//!     1200.0,
//!     FeatureRecord::new("sword").with("level", 100.0).with("damage", 52.0),
//! );
//! assert!(target.validate().is_ok());
//! assert!(listing.validate().is_ok());
//! ```

pub mod anchor;
pub mod error;
pub mod feature;
pub mod filter;
pub mod record;
pub mod source;

pub use anchor::{Anchor, AnchorSummary};
pub use error::{Error, Result};
pub use feature::{FeatureRecord, FeatureValue};
pub use filter::{CandidateFilter, Filter, FilterCondition, PrimaryRange};
pub use record::{MarketRecord, RecordId, ValuationTarget};
pub use source::{InMemoryMarket, MarketDataSource, UnavailableMarket};
