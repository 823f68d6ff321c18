//! Market data collaborators
//!
//! The engine never queries storage itself: a [`MarketDataSource`] hands it an
//! already pre-filtered snapshot of candidates for each target.

use crate::filter::{CandidateFilter, Filter, PrimaryRange};
use crate::{Error, MarketRecord, Result, ValuationTarget};
use std::path::Path;

/// Supplies candidate market records for a valuation target
pub trait MarketDataSource: Send + Sync {
    fn candidates(&self, target: &ValuationTarget) -> Result<Vec<MarketRecord>>;
}

/// Market snapshot held in memory, with coarse category/range pre-filtering
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarket {
    records: Vec<MarketRecord>,
    primary_range: Option<PrimaryRange>,
}

impl InMemoryMarket {
    pub fn new(records: Vec<MarketRecord>) -> Self {
        Self {
            records,
            primary_range: None,
        }
    }

    /// Load a JSON array of market records.
    ///
    /// Entries that do not deserialize are skipped and logged; the count of
    /// skipped entries is returned alongside the market.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<(Self, usize)> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let total = values.len();

        let mut records = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<MarketRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable market record");
                }
            }
        }

        let skipped = total - records.len();
        Ok((Self::new(records), skipped))
    }

    #[must_use]
    pub fn with_primary_range(mut self, range: PrimaryRange) -> Self {
        self.primary_range = Some(range);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }
}

impl MarketDataSource for InMemoryMarket {
    fn candidates(&self, target: &ValuationTarget) -> Result<Vec<MarketRecord>> {
        let filter = CandidateFilter::for_target(target, self.primary_range.as_ref());
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

/// Source that always fails; stands in for an unreachable repository
#[derive(Debug, Clone)]
pub struct UnavailableMarket(pub String);

impl MarketDataSource for UnavailableMarket {
    fn candidates(&self, _target: &ValuationTarget) -> Result<Vec<MarketRecord>> {
        Err(Error::MarketData(self.0.clone()))
    }
}
