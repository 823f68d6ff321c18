use serde::{Deserialize, Serialize};
use crate::feature::FeatureRecord;
use crate::record::{MarketRecord, RecordId};

/// A market record selected as comparable to a valuation target
///
/// Created per valuation call and never persisted. `similarity` is always
/// in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub id: RecordId,
    pub similarity: f64,
    pub price: f64,
    pub features: FeatureRecord,
}

impl Anchor {
    pub fn from_record(record: &MarketRecord, similarity: f64) -> Self {
        Self {
            id: record.id.clone(),
            similarity: similarity.clamp(0.0, 1.0),
            price: record.price,
            features: record.record.clone(),
        }
    }

    pub fn summary(&self) -> AnchorSummary {
        AnchorSummary {
            id: self.id.clone(),
            similarity: self.similarity,
            price: self.price,
        }
    }
}

/// Serializable view of an anchor, as reported in valuation results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnchorSummary {
    pub id: RecordId,
    pub similarity: f64,
    pub price: f64,
}

impl From<&Anchor> for AnchorSummary {
    fn from(anchor: &Anchor) -> Self {
        anchor.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_clamps_similarity() {
        let record = MarketRecord::new("x", 10.0, FeatureRecord::new("ring"));
        assert_eq!(Anchor::from_record(&record, 1.2).similarity, 1.0);
        assert_eq!(Anchor::from_record(&record, -0.1).similarity, 0.0);
    }

    #[test]
    fn test_summary_serialization() {
        let record = MarketRecord::new("x", 10.0, FeatureRecord::new("ring").with("level", 3.0));
        let summary = Anchor::from_record(&record, 0.75).summary();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["id"], "x");
        assert_eq!(json["similarity"], 0.75);
        assert_eq!(json["price"], 10.0);
        assert!(json.get("features").is_none());
    }
}
