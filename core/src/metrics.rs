//! Aggregate metrics engine: overview totals, weighted rates and
//! per-segment rollups over a filtered record set.
//!
//! Negative balances are included here: totals reflect true portfolio
//! size including liabilities. Empty sets give zero counts and sums and
//! undefined (`None`) averages and rates.

use crate::{
    record::{AccountRecord, Dimension},
    types::{ratio, Metric},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub accounts: u64,
    pub total_balance: f64,
    pub total_loan_amount: f64,
    pub weighted_avg_interest_rate: Metric,
    pub avg_net_flow: Metric,
    pub total_net_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub segment: String,
    pub accounts: u64,
    pub total_balance: f64,
    pub avg_balance: Metric,
    pub total_loan_amount: f64,
    pub weighted_avg_interest_rate: Metric,
    pub avg_net_flow: Metric,
    pub total_net_flow: f64,
}

/// Row ordering for a segment rollup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOrder {
    /// Listed values first, in list order; anything else after, by name.
    Domain(Vec<String>),
    /// Largest `total_net_flow` first; ties by name.
    NetFlowDesc,
}

/// Running sums for one group of records.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    accounts: u64,
    balance_sum: f64,
    balance_count: u64,
    loan_sum: f64,
    rate_weighted_sum: f64,
    rate_weight: f64,
    flow_sum: f64,
    flow_count: u64,
}

impl Accumulator {
    fn push(&mut self, r: &AccountRecord) {
        self.accounts += 1;
        if let Some(b) = r.balance {
            self.balance_sum += b;
            self.balance_count += 1;
        }
        if let Some(l) = r.loan_amount {
            self.loan_sum += l;
        }
        if let (Some(rate), Some(b)) = (r.interest_rate, r.balance) {
            self.rate_weighted_sum += rate * b;
            self.rate_weight += b;
        }
        if let Some(f) = r.net_flow {
            self.flow_sum += f;
            self.flow_count += 1;
        }
    }

    fn weighted_rate(&self) -> Metric {
        ratio(self.rate_weighted_sum, self.rate_weight)
    }

    fn avg_balance(&self) -> Metric {
        ratio(self.balance_sum, self.balance_count as f64)
    }

    fn avg_net_flow(&self) -> Metric {
        ratio(self.flow_sum, self.flow_count as f64)
    }

    fn overview(&self) -> Overview {
        Overview {
            accounts: self.accounts,
            total_balance: self.balance_sum,
            total_loan_amount: self.loan_sum,
            weighted_avg_interest_rate: self.weighted_rate(),
            avg_net_flow: self.avg_net_flow(),
            total_net_flow: self.flow_sum,
        }
    }

    fn segment(&self, segment: String) -> SegmentRow {
        SegmentRow {
            segment,
            accounts: self.accounts,
            total_balance: self.balance_sum,
            avg_balance: self.avg_balance(),
            total_loan_amount: self.loan_sum,
            weighted_avg_interest_rate: self.weighted_rate(),
            avg_net_flow: self.avg_net_flow(),
            total_net_flow: self.flow_sum,
        }
    }
}

/// Portfolio overview of an already-filtered record set.
pub fn overview(records: &[AccountRecord]) -> Overview {
    let mut acc = Accumulator::default();
    for r in records {
        acc.push(r);
    }
    acc.overview()
}

/// One row per distinct non-null value of `dimension`.
/// Records with a null group value are left out.
pub fn segment_rollup(
    records: &[AccountRecord],
    dimension: Dimension,
    order: &SegmentOrder,
) -> Vec<SegmentRow> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in records {
        if let Some(key) = r.category(dimension) {
            groups.entry(key).or_default().push(r);
        }
    }

    let mut rows: Vec<SegmentRow> = groups
        .into_iter()
        .map(|(key, acc)| acc.segment(key.to_string()))
        .collect();

    match order {
        SegmentOrder::Domain(known) => {
            let rank = |name: &str| known.iter().position(|k| k == name).unwrap_or(known.len());
            rows.sort_by(|a, b| {
                rank(&a.segment)
                    .cmp(&rank(&b.segment))
                    .then_with(|| a.segment.cmp(&b.segment))
            });
        }
        SegmentOrder::NetFlowDesc => {
            rows.sort_by(|a, b| {
                b.total_net_flow
                    .total_cmp(&a.total_net_flow)
                    .then_with(|| a.segment.cmp(&b.segment))
            });
        }
    }
    rows
}
