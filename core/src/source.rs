//! Record source trait and an in-memory implementation.
//!
//! RULE: The dashboard only reaches records through `RecordSource`.
//! `AccountStore` answers with parameterised SQL; `InMemorySource`
//! answers with `FilterSelection::matches` over a loaded snapshot.
//! Both must return the same records for the same selection.

use crate::{
    error::AnalyticsResult,
    filter::{FilterDomain, FilterSelection},
    record::{AccountRecord, Dimension},
    store::AccountStore,
};
use std::collections::BTreeSet;

pub trait RecordSource {
    /// Short stable name for logs.
    fn name(&self) -> &str;

    /// Sorted distinct non-null values of one dimension.
    fn distinct_values(&self, dimension: Dimension) -> AnalyticsResult<Vec<String>>;

    /// Every record passing the filter.
    fn accounts(&self, filter: &FilterSelection) -> AnalyticsResult<Vec<AccountRecord>>;

    /// Load the filter domain. Called once per session.
    fn filter_domain(&self) -> AnalyticsResult<FilterDomain> {
        Ok(FilterDomain {
            risk_tolerance: self.distinct_values(Dimension::RiskTolerance)?,
            region: self.distinct_values(Dimension::Region)?,
            account_type: self.distinct_values(Dimension::AccountType)?,
        })
    }
}

impl RecordSource for AccountStore {
    fn name(&self) -> &str {
        self.path().unwrap_or(":memory:")
    }

    fn distinct_values(&self, dimension: Dimension) -> AnalyticsResult<Vec<String>> {
        AccountStore::distinct_values(self, dimension)
    }

    fn accounts(&self, filter: &FilterSelection) -> AnalyticsResult<Vec<AccountRecord>> {
        AccountStore::accounts(self, filter)
    }
}

/// A fixed snapshot of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<AccountRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<AccountRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AccountRecord] {
        &self.records
    }
}

impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn distinct_values(&self, dimension: Dimension) -> AnalyticsResult<Vec<String>> {
        let values: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.category(dimension))
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    fn accounts(&self, filter: &FilterSelection) -> AnalyticsResult<Vec<AccountRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}
