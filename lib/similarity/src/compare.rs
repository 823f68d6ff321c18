//! Per-feature comparison
//!
//! Comparing two feature values is a two-step decision table:
//!
//! 1. [`Case::classify`] looks only at the value kinds (number, list, other,
//!    missing) and the zero special cases.
//! 2. [`Case::score`] maps the case to a similarity in `[0, 1]`; numeric
//!    differences go through a [`ToleranceBand`].
//!
//! Each branch is a named variant, so every one can be tested on its own.

use crate::config::SimilarityConfig;
use compval_core::FeatureValue;

/// Where a relative difference falls with respect to a feature's tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceBand {
    /// `diff <= tolerance`: considered equivalent
    Within,
    /// `tolerance < diff <= 2 * tolerance`: linear decay from 1 to 0
    Decay,
    /// `diff > 2 * tolerance`
    Beyond,
}

impl ToleranceBand {
    pub fn classify(diff: f64, tolerance: f64) -> Self {
        if diff <= tolerance {
            ToleranceBand::Within
        } else if diff <= 2.0 * tolerance {
            ToleranceBand::Decay
        } else {
            ToleranceBand::Beyond
        }
    }

    pub fn score(self, diff: f64, tolerance: f64) -> f64 {
        match self {
            ToleranceBand::Within => 1.0,
            // Decay is only reachable with tolerance > 0
            ToleranceBand::Decay => (1.0 - (diff - tolerance) / tolerance).clamp(0.0, 1.0),
            ToleranceBand::Beyond => 0.0,
        }
    }
}

/// How one feature is compared, taken from the effective rule set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRule {
    pub tolerance: f64,
    pub exact: bool,
}

/// Kind-level classification of a pair of feature values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Case<'a> {
    /// Neither side has the feature
    Absent,
    BothZero,
    OneZero,
    /// Two non-zero numbers, with their relative difference
    Relative(f64),
    /// Two lists of equal length
    Elementwise(&'a [FeatureValue], &'a [FeatureValue]),
    /// Two lists of different length
    LengthMismatch,
    /// Anything else: strings, mixed kinds, one-sided missing
    Discrete { matched: bool },
}

impl<'a> Case<'a> {
    pub fn classify(target: Option<&'a FeatureValue>, candidate: Option<&'a FeatureValue>) -> Self {
        match (target, candidate) {
            (None, None) => Case::Absent,
            (Some(FeatureValue::Number(a)), Some(FeatureValue::Number(b))) => {
                Self::classify_numbers(*a, *b)
            }
            (Some(FeatureValue::List(a)), Some(FeatureValue::List(b))) => {
                if a.len() == b.len() {
                    Case::Elementwise(a, b)
                } else {
                    Case::LengthMismatch
                }
            }
            (Some(a), Some(b)) => Case::Discrete { matched: a == b },
            _ => Case::Discrete { matched: false },
        }
    }

    pub fn classify_numbers(a: f64, b: f64) -> Self {
        match (a == 0.0, b == 0.0) {
            (true, true) => Case::BothZero,
            (true, false) | (false, true) => Case::OneZero,
            (false, false) => Case::Relative((a - b).abs() / a.abs().max(b.abs())),
        }
    }

    /// Similarity for this case. `Absent` scores 0.0; callers skip absent
    /// features before weighting.
    pub fn score(self, rule: &FeatureRule, config: &SimilarityConfig) -> f64 {
        match self {
            Case::Absent => 0.0,
            Case::BothZero => 1.0,
            Case::OneZero => config.asymmetric_zero_credit,
            Case::Relative(diff) => {
                ToleranceBand::classify(diff, rule.tolerance).score(diff, rule.tolerance)
            }
            Case::Elementwise(a, b) => elementwise(a, b, rule, config),
            Case::LengthMismatch => 0.0,
            Case::Discrete { matched: true } => 1.0,
            Case::Discrete { matched: false } if rule.exact => config.strict_mismatch,
            Case::Discrete { matched: false } => config.unmatched_default,
        }
    }
}

/// Numeric rule applied to a single pair of numbers
pub fn number_similarity(a: f64, b: f64, rule: &FeatureRule, config: &SimilarityConfig) -> f64 {
    Case::classify_numbers(a, b).score(rule, config)
}

/// Mean of element similarities: numeric rule for number pairs, exact match otherwise.
/// Two empty lists are identical.
fn elementwise(
    a: &[FeatureValue],
    b: &[FeatureValue],
    rule: &FeatureRule,
    config: &SimilarityConfig,
) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let total: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (FeatureValue::Number(x), FeatureValue::Number(y)) => {
                number_similarity(*x, *y, rule, config)
            }
            _ if x == y => 1.0,
            _ => 0.0,
        })
        .sum();
    total / a.len() as f64
}

/// Similarity of one feature under the default comparator
pub fn compare(
    target: Option<&FeatureValue>,
    candidate: Option<&FeatureValue>,
    rule: &FeatureRule,
    config: &SimilarityConfig,
) -> f64 {
    Case::classify(target, candidate).score(rule, config)
}
