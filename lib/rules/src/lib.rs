//! # compval Rules
//!
//! Category rule registry for the compval valuation engine.
//!
//! A base [`CategoryRuleSet`] (feature weights, relative tolerances,
//! exact-match features) is layered with [`CategoryPlugin`]s for the
//! categories they support. The resulting [`RuleRegistry`] is built once at
//! startup and is read-only afterwards.
//!
//! ## Example
//!
//! ```rust
//! use compval_rules::{CategoryRuleSet, RuleRegistry, EquipmentPlugin};
//!
//! let base = CategoryRuleSet::new()
//!     .weight("level", 1.0)
//!     .tolerance("level", 0.1);
//!
//! let registry = RuleRegistry::builder(base)
//!     .register(EquipmentPlugin)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.final_weights("sword")["damage"], 4.0);
//! // Categories without a plugin fall back to the base rules
//! assert_eq!(registry.final_weights("scroll").len(), 1);
//! ```

pub mod declarative;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod rules;

pub use declarative::{DeclarativePlugin, RulesConfig};
pub use plugin::CategoryPlugin;
pub use plugins::{builtin_plugins, CompanionPlugin, EquipmentPlugin, JewelryPlugin};
pub use registry::{EffectiveRules, RegistryBuilder, RuleRegistry};
pub use rules::{CategoryRuleSet, FeatureTable};
