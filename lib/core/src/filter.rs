// Coarse candidate pre-filtering, applied by market data sources before scoring
use crate::{FeatureValue, MarketRecord, ValuationTarget};

pub trait Filter {
    fn matches(&self, record: &MarketRecord) -> bool;
}

pub struct CandidateFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone)]
pub enum FilterCondition {
    CategoryIs(String),
    Equals { feature: String, value: FeatureValue },
    Between { feature: String, min: f64, max: f64 },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

/// Numeric window around the target's value of one primary attribute
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRange {
    pub feature: String,
    pub below: f64,
    pub above: f64,
}

impl PrimaryRange {
    pub fn new(feature: impl Into<String>, below: f64, above: f64) -> Self {
        Self {
            feature: feature.into(),
            below: below.abs(),
            above: above.abs(),
        }
    }
}

impl CandidateFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// Same category as the target and, when the target carries the primary
    /// attribute, within the configured window around it.
    pub fn for_target(target: &ValuationTarget, primary: Option<&PrimaryRange>) -> Self {
        let mut conditions = vec![FilterCondition::CategoryIs(target.category().to_string())];
        if let Some(range) = primary {
            if let Some(value) = target.record.number(&range.feature) {
                conditions.push(FilterCondition::Between {
                    feature: range.feature.clone(),
                    min: value - range.below,
                    max: value + range.above,
                });
            }
        }
        Self::new(FilterCondition::And(conditions))
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, record: &MarketRecord) -> bool {
        match condition {
            FilterCondition::CategoryIs(category) => record.record.category == *category,
            FilterCondition::Equals { feature, value } => record
                .record
                .get(feature)
                .map(|v| v == value)
                .unwrap_or(false),
            FilterCondition::Between { feature, min, max } => record
                .record
                .number(feature)
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, record))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, record))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, record),
        }
    }
}

impl Filter for CandidateFilter {
    fn matches(&self, record: &MarketRecord) -> bool {
        Self::matches_condition(&self.condition, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureRecord;

    fn listing(id: &str, category: &str, level: f64) -> MarketRecord {
        MarketRecord::new(id, 100.0, FeatureRecord::new(category).with("level", level))
    }

    #[test]
    fn test_for_target_category_and_range() {
        let target = ValuationTarget::new(FeatureRecord::new("ring").with("level", 100.0));
        let range = PrimaryRange::new("level", 10.0, 5.0);
        let filter = CandidateFilter::for_target(&target, Some(&range));

        assert!(filter.matches(&listing("a", "ring", 90.0)));
        assert!(filter.matches(&listing("b", "ring", 105.0)));
        assert!(!filter.matches(&listing("c", "ring", 106.0)));
        assert!(!filter.matches(&listing("d", "amulet", 100.0)));
    }

    #[test]
    fn test_for_target_without_primary_value() {
        let target = ValuationTarget::new(FeatureRecord::new("ring"));
        let range = PrimaryRange::new("level", 10.0, 10.0);
        let filter = CandidateFilter::for_target(&target, Some(&range));

        assert!(filter.matches(&listing("a", "ring", 500.0)));
    }

    #[test]
    fn test_not_and_or() {
        let filter = CandidateFilter::new(FilterCondition::Or(vec![
            FilterCondition::Not(Box::new(FilterCondition::CategoryIs("ring".to_string()))),
            FilterCondition::Equals {
                feature: "level".to_string(),
                value: FeatureValue::Number(1.0),
            },
        ]));

        assert!(filter.matches(&listing("a", "amulet", 50.0)));
        assert!(filter.matches(&listing("b", "ring", 1.0)));
        assert!(!filter.matches(&listing("c", "ring", 2.0)));
    }
}
