//! Concentration engine: top-decile share, decile table, Lorenz curve
//! and Gini coefficient.
//!
//! Only non-null, non-negative balances take part. The filter is applied
//! again here on every entry point; callers may or may not have excluded
//! negatives already.
//!
//! No data (zero eligible accounts, or a zero total) is `None` for the
//! whole result, never a zeroed result.

use crate::{
    record::AccountRecord,
    types::{ratio, Metric},
};
use serde::{Deserialize, Serialize};

pub const DECILES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzPoint {
    pub population_share: f64,
    pub wealth_share: f64,
}

impl LorenzPoint {
    pub const ORIGIN: LorenzPoint = LorenzPoint {
        population_share: 0.0,
        wealth_share: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileRow {
    /// 1 = richest.
    pub decile: u8,
    pub accounts: u64,
    pub min_balance: Metric,
    pub avg_balance: Metric,
    pub max_balance: Metric,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationResult {
    /// Accounts with an eligible balance.
    pub accounts: u64,
    /// Filtered accounts left out for a null or negative balance.
    pub excluded_accounts: u64,
    pub total_balance: f64,
    pub top_decile_accounts: u64,
    pub top_decile_balance: f64,
    pub top_decile_share: Metric,
    pub deciles: Vec<DecileRow>,
    /// Starts at the origin; `accounts + 1` points.
    pub lorenz: Vec<LorenzPoint>,
    pub gini: Metric,
}

/// Non-null, non-negative balances of `records`, in record order.
pub fn eligible_balances(records: &[AccountRecord]) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.balance)
        .filter(|b| is_eligible(*b))
        .collect()
}

fn is_eligible(balance: f64) -> bool {
    balance.is_finite() && balance >= 0.0
}

/// Full concentration result for an already-filtered record set.
pub fn concentration(records: &[AccountRecord]) -> Option<ConcentrationResult> {
    let ranked = RankedBalances::new(eligible_balances(records))?;
    let excluded = records.len() - ranked.len();
    let mut result = ranked.result();
    result.excluded_accounts = excluded as u64;
    Some(result)
}

/// Eligible balances sorted descending (stable, so ties keep input order),
/// with a strictly positive total.
#[derive(Debug, Clone)]
pub struct RankedBalances {
    descending: Vec<f64>,
    total: f64,
}

impl RankedBalances {
    /// Returns `None` when nothing eligible remains or the total is zero.
    pub fn new(balances: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut descending: Vec<f64> = balances.into_iter().filter(|b| is_eligible(*b)).collect();
        descending.sort_by(|a, b| b.total_cmp(a));
        let total: f64 = descending.iter().sum();
        if descending.is_empty() || total <= 0.0 {
            return None;
        }
        Some(Self { descending, total })
    }

    pub fn len(&self) -> usize {
        self.descending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descending.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn descending(&self) -> &[f64] {
        &self.descending
    }

    /// Size of the top decile: ceil(n / 10), in integer arithmetic.
    pub fn top_decile_len(&self) -> usize {
        self.len().div_ceil(DECILES)
    }

    /// Balance held by the top decile and its share of the total.
    pub fn top_decile(&self) -> (f64, Metric) {
        let top: f64 = self.descending[..self.top_decile_len()].iter().sum();
        (top, ratio(top, self.total))
    }

    /// NTILE(10) bucket sizes: the first `n mod 10` buckets hold one extra.
    pub fn decile_sizes(&self) -> [usize; DECILES] {
        let base = self.len() / DECILES;
        let extra = self.len() % DECILES;
        std::array::from_fn(|i| base + usize::from(i < extra))
    }

    /// Always ten rows; rows past the end of a short population are empty.
    pub fn deciles(&self) -> Vec<DecileRow> {
        let mut rest = self.descending.as_slice();
        self.decile_sizes()
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let (bucket, tail) = rest.split_at(size);
                rest = tail;
                decile_row(i as u8 + 1, bucket)
            })
            .collect()
    }

    /// Lazily evaluated Lorenz curve, ascending by balance.
    pub fn lorenz(&self) -> LorenzCurve<'_> {
        LorenzCurve::new(&self.descending)
    }

    pub fn gini(&self) -> Metric {
        gini_from_points(self.lorenz())
    }

    pub fn result(&self) -> ConcentrationResult {
        let (top_balance, top_share) = self.top_decile();
        let lorenz: Vec<LorenzPoint> = self.lorenz().collect();
        let gini = gini_from_points(lorenz.iter().copied());
        ConcentrationResult {
            accounts: self.len() as u64,
            excluded_accounts: 0,
            total_balance: self.total,
            top_decile_accounts: self.top_decile_len() as u64,
            top_decile_balance: top_balance,
            top_decile_share: top_share,
            deciles: self.deciles(),
            lorenz,
            gini,
        }
    }
}

/// `bucket` is sorted descending.
fn decile_row(decile: u8, bucket: &[f64]) -> DecileRow {
    let total: f64 = bucket.iter().sum();
    DecileRow {
        decile,
        accounts: bucket.len() as u64,
        min_balance: bucket.last().copied(),
        avg_balance: ratio(total, bucket.len() as f64),
        max_balance: bucket.first().copied(),
        total_balance: total,
    }
}

/// Lorenz curve over balances held in descending order, walked in
/// reverse so points come out ascending. Yields `n + 1` points, the
/// first being the origin. Single pass; build a new one to restart.
#[derive(Debug, Clone)]
pub struct LorenzCurve<'a> {
    ascending: std::iter::Rev<std::slice::Iter<'a, f64>>,
    n: usize,
    total: f64,
    rank: usize,
    cumulative: f64,
    started: bool,
}

impl<'a> LorenzCurve<'a> {
    fn new(descending: &'a [f64]) -> Self {
        // Same summation order as the cumulative walk, so the last
        // point lands exactly on (1, 1).
        let total: f64 = descending.iter().rev().sum();
        Self {
            ascending: descending.iter().rev(),
            n: descending.len(),
            total,
            rank: 0,
            cumulative: 0.0,
            started: false,
        }
    }
}

impl Iterator for LorenzCurve<'_> {
    type Item = LorenzPoint;

    fn next(&mut self) -> Option<LorenzPoint> {
        if !self.started {
            self.started = true;
            return Some(LorenzPoint::ORIGIN);
        }
        let balance = self.ascending.next()?;
        self.rank += 1;
        self.cumulative += balance;
        Some(LorenzPoint {
            population_share: self.rank as f64 / self.n as f64,
            wealth_share: self.cumulative / self.total,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.n - self.rank + usize::from(!self.started);
        (left, Some(left))
    }
}

impl ExactSizeIterator for LorenzCurve<'_> {}

/// Gini = 1 - 2A, with A the trapezoidal area under the curve, integrated
/// over the population-share axis. The first point should be the origin.
/// Fewer than two points is undefined.
pub fn gini_from_points<I>(points: I) -> Metric
where
    I: IntoIterator<Item = LorenzPoint>,
{
    let mut points = points.into_iter();
    let mut prev = points.next()?;
    let mut doubled_area = 0.0;
    let mut segments = 0usize;
    for p in points {
        doubled_area +=
            (p.population_share - prev.population_share) * (p.wealth_share + prev.wealth_share);
        prev = p;
        segments += 1;
    }
    if segments == 0 {
        return None;
    }
    let gini = 1.0 - doubled_area;
    gini.is_finite().then_some(gini)
}
