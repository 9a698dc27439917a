//! Synthetic account snapshots for demos and tests.
//!
//! Balances are Pareto-distributed per account type so the portfolio
//! shows realistic concentration. A small share of accounts is
//! overdrawn, and every nullable column is occasionally null.

use crate::{
    record::AccountRecord,
    rng::{SeededRng, Stream},
};

pub const RISK_TIERS: [(&str, f64); 3] = [("Low", 0.40), ("Medium", 0.40), ("High", 0.20)];
pub const REGIONS: [(&str, f64); 4] = [
    ("Northeast", 0.25),
    ("South", 0.35),
    ("Midwest", 0.20),
    ("West", 0.20),
];

struct AccountTypeProfile {
    name: &'static str,
    weight: f64,
    balance_xmin: f64,
    balance_alpha: f64,
    rate_lo: f64,
    rate_hi: f64,
    loan_probability: f64,
}

static ACCOUNT_TYPES: [AccountTypeProfile; 3] = [
    AccountTypeProfile {
        name: "Checking",
        weight: 0.55,
        balance_xmin: 500.0,
        balance_alpha: 1.8,
        rate_lo: 0.0005,
        rate_hi: 0.01,
        loan_probability: 0.35,
    },
    AccountTypeProfile {
        name: "Savings",
        weight: 0.30,
        balance_xmin: 2_000.0,
        balance_alpha: 1.5,
        rate_lo: 0.02,
        rate_hi: 0.05,
        loan_probability: 0.15,
    },
    AccountTypeProfile {
        name: "Brokerage",
        weight: 0.15,
        balance_xmin: 10_000.0,
        balance_alpha: 1.2,
        rate_lo: 0.0,
        rate_hi: 0.02,
        loan_probability: 0.05,
    },
];

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub accounts: usize,
    pub seed: u64,
    /// Probability that an account is overdrawn.
    pub overdrawn_share: f64,
    /// Per-column probability of a null value.
    pub null_share: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            accounts: 1_000,
            seed: 42,
            overdrawn_share: 0.03,
            null_share: 0.02,
        }
    }
}

/// Generate `config.accounts` records. Same config, same records.
pub fn generate(config: &SyntheticConfig) -> Vec<AccountRecord> {
    let mut identity = SeededRng::new(config.seed, Stream::Identity);
    let mut category = SeededRng::new(config.seed, Stream::Category);
    let mut balance_rng = SeededRng::new(config.seed, Stream::Balance);
    let mut lending = SeededRng::new(config.seed, Stream::Lending);
    let mut flow = SeededRng::new(config.seed, Stream::Flow);
    let mut nulls = SeededRng::new(config.seed, Stream::Nulls);

    let type_weights: Vec<(usize, f64)> = ACCOUNT_TYPES
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.weight))
        .collect();

    let mut records = Vec::with_capacity(config.accounts);
    for _ in 0..config.accounts {
        let mut id_bytes = [0u8; 16];
        identity.fill_bytes(&mut id_bytes);
        let account_id = uuid::Builder::from_random_bytes(id_bytes)
            .into_uuid()
            .to_string();

        let profile = &ACCOUNT_TYPES[*category.weighted(&type_weights)];
        let risk = *category.weighted(&RISK_TIERS);
        let region = *category.weighted(&REGIONS);

        let balance = if balance_rng.chance(config.overdrawn_share) {
            -balance_rng.pareto(50.0, 2.0)
        } else {
            balance_rng.pareto(profile.balance_xmin, profile.balance_alpha)
        };
        let balance = round_cents(balance);

        let loan_amount = if lending.chance(profile.loan_probability) {
            round_cents(lending.pareto(5_000.0, 2.0))
        } else {
            0.0
        };
        let interest_rate = lending.uniform(profile.rate_lo, profile.rate_hi);

        // Flows skew slightly positive and scale with the balance.
        let net_flow = round_cents(flow.uniform(-0.08, 0.12) * balance.abs().max(100.0));

        let mut keep = || !nulls.chance(config.null_share);
        records.push(AccountRecord {
            account_id,
            balance: keep().then_some(balance),
            loan_amount: keep().then_some(loan_amount),
            interest_rate: keep().then_some(interest_rate),
            net_flow: keep().then_some(net_flow),
            risk_tolerance: keep().then(|| risk.to_string()),
            region: keep().then(|| region.to_string()),
            account_type: keep().then(|| profile.name.to_string()),
        });
    }
    log::debug!(
        "Generated {} synthetic accounts (seed {})",
        records.len(),
        config.seed
    );
    records
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
