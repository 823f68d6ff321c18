use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::{Error, Result};
use crate::feature::FeatureRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    String(String),
    Uuid(Uuid),
    Integer(u64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::String(s) => write!(f, "{}", s),
            RecordId::Uuid(u) => write!(f, "{}", u),
            RecordId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::String(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::String(s.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(i: u64) -> Self {
        RecordId::Integer(i)
    }
}

impl From<Uuid> for RecordId {
    fn from(u: Uuid) -> Self {
        RecordId::Uuid(u)
    }
}

/// An already-priced market listing supplied by the market data repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketRecord {
    pub id: RecordId,
    pub price: f64,
    #[serde(flatten)]
    pub record: FeatureRecord,
}

impl MarketRecord {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<RecordId>, price: f64, record: FeatureRecord) -> Self {
        Self {
            id: id.into(),
            price,
            record,
        }
    }

    /// Reject records that cannot take part in a valuation
    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::Data {
                id: self.id.to_string(),
                reason: format!("price {} is not a non-negative number", self.price),
            });
        }
        if let RecordId::String(s) = &self.id {
            if s.is_empty() {
                return Err(Error::Data {
                    id: String::new(),
                    reason: "empty id".to_string(),
                });
            }
        }
        match self.record.check() {
            Some(reason) => Err(Error::Data {
                id: self.id.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// The item being priced
///
/// `id` is set when re-pricing a listing that is itself part of the market
/// data, so the listing can be excluded from its own comparables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub record: FeatureRecord,
}

impl ValuationTarget {
    #[inline]
    #[must_use]
    pub fn new(record: FeatureRecord) -> Self {
        Self { id: None, record }
    }

    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.record.category
    }

    pub fn validate(&self) -> Result<()> {
        match self.record.check() {
            Some(reason) => Err(Error::Data {
                id: self
                    .id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "<target>".to_string()),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl From<FeatureRecord> for ValuationTarget {
    fn from(record: FeatureRecord) -> Self {
        ValuationTarget::new(record)
    }
}
