//! Explainability for similarity scores
//!
//! Shows how each weighted feature contributed to a target/candidate score.

use serde::Serialize;

/// One feature's part in a similarity score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureContribution {
    pub feature: String,
    /// Unweighted similarity of this feature in [0, 1]
    pub similarity: f64,
    pub weight: f64,
}

impl FeatureContribution {
    /// Weighted similarity of this feature
    pub fn contribution(&self) -> f64 {
        self.similarity * self.weight
    }
}

/// A similarity score with its per-feature breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub total_weight: f64,
    pub features: Vec<FeatureContribution>,
}

impl ScoreBreakdown {
    pub fn from_contributions(features: Vec<FeatureContribution>) -> Self {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for f in &features {
            weighted += f.contribution();
            total_weight += f.weight;
        }
        let score = if total_weight <= 0.0 {
            0.0
        } else {
            (weighted / total_weight).clamp(0.0, 1.0)
        };

        Self {
            score,
            total_weight,
            features,
        }
    }

    /// Feature that added the most weighted similarity
    pub fn top_contributor(&self) -> Option<&FeatureContribution> {
        self.features.iter().max_by(|a, b| {
            a.contribution()
                .partial_cmp(&b.contribution())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Feature that lost the most weight relative to a perfect match
    pub fn largest_shortfall(&self) -> Option<&FeatureContribution> {
        self.features
            .iter()
            .filter(|f| f.similarity < 1.0)
            .max_by(|a, b| {
                let lost_a = a.weight * (1.0 - a.similarity);
                let lost_b = b.weight * (1.0 - b.similarity);
                lost_a.partial_cmp(&lost_b).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(feature: &str, similarity: f64, weight: f64) -> FeatureContribution {
        FeatureContribution {
            feature: feature.to_string(),
            similarity,
            weight,
        }
    }

    #[test]
    fn test_breakdown_score() {
        let breakdown = ScoreBreakdown::from_contributions(vec![
            contribution("level", 1.0, 1.0),
            contribution("damage", 0.0, 4.0),
        ]);

        assert!((breakdown.score - 0.2).abs() < 1e-12);
        assert_eq!(breakdown.total_weight, 5.0);
        assert_eq!(breakdown.top_contributor().unwrap().feature, "level");
        assert_eq!(breakdown.largest_shortfall().unwrap().feature, "damage");
    }

    #[test]
    fn test_empty_breakdown() {
        let breakdown = ScoreBreakdown::from_contributions(Vec::new());
        assert_eq!(breakdown.score, 0.0);
        assert!(breakdown.top_contributor().is_none());
        assert!(breakdown.largest_shortfall().is_none());
    }

    #[test]
    fn test_serialization() {
        let breakdown = ScoreBreakdown::from_contributions(vec![contribution("level", 0.5, 2.0)]);
        let json = serde_json::to_string(&breakdown).unwrap();

        assert!(json.contains("\"score\""));
        assert!(json.contains("\"features\""));
        assert!(json.contains("\"level\""));
    }
}
