use compval_core::{Error, Result};
use serde::{Deserialize, Serialize};

fn default_asymmetric_zero_credit() -> f64 {
    0.3
}

fn default_unmatched_default() -> f64 {
    0.5
}

fn default_strict_mismatch() -> f64 {
    0.0
}

fn default_default_tolerance() -> f64 {
    0.1
}

/// Calibration constants of the similarity function
///
/// These were tuned by hand against historical listings and should be
/// re-validated per deployment rather than treated as fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityConfig {
    /// Score when exactly one of two numbers is zero ("absent stat" vs "small stat")
    #[serde(default = "default_asymmetric_zero_credit")]
    pub asymmetric_zero_credit: f64,

    /// Score for unmatched non-numeric values of ordinary features
    #[serde(default = "default_unmatched_default")]
    pub unmatched_default: f64,

    /// Score for unmatched values of exact-match features
    #[serde(default = "default_strict_mismatch")]
    pub strict_mismatch: f64,

    /// Relative tolerance for weighted numeric features without one
    #[serde(default = "default_default_tolerance")]
    pub default_tolerance: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            asymmetric_zero_credit: default_asymmetric_zero_credit(),
            unmatched_default: default_unmatched_default(),
            strict_mismatch: default_strict_mismatch(),
            default_tolerance: default_default_tolerance(),
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<()> {
        let scores = [
            ("asymmetric_zero_credit", self.asymmetric_zero_credit),
            ("unmatched_default", self.unmatched_default),
            ("strict_mismatch", self.strict_mismatch),
        ];
        for (name, value) in scores {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Configuration(format!(
                    "similarity.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !self.default_tolerance.is_finite() || self.default_tolerance < 0.0 {
            return Err(Error::Configuration(format!(
                "similarity.default_tolerance must be a non-negative number, got {}",
                self.default_tolerance
            )));
        }
        Ok(())
    }
}
