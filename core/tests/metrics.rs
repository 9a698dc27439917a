//! Aggregate metrics engine: overview totals, weighted rates, rollups.

use wealth_core::{
    metrics::{overview, segment_rollup, SegmentOrder},
    record::{AccountRecord, Dimension},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn account(
    id: &str,
    balance: Option<f64>,
    rate: Option<f64>,
    loan: Option<f64>,
    flow: Option<f64>,
    risk: Option<&str>,
    region: Option<&str>,
    kind: Option<&str>,
) -> AccountRecord {
    AccountRecord {
        account_id: id.into(),
        balance,
        loan_amount: loan,
        interest_rate: rate,
        net_flow: flow,
        risk_tolerance: risk.map(str::to_string),
        region: region.map(str::to_string),
        account_type: kind.map(str::to_string),
    }
}

fn portfolio() -> Vec<AccountRecord> {
    vec![
        account("a", Some(1000.0), Some(0.05), Some(200.0), Some(50.0), Some("Low"), Some("Northeast"), Some("Checking")),
        account("b", Some(3000.0), Some(0.01), None, Some(-20.0), Some("High"), Some("West"), Some("Savings")),
        account("c", Some(-500.0), Some(0.20), Some(100.0), None, Some("Low"), Some("West"), Some("Checking")),
        account("d", None, Some(0.03), Some(50.0), Some(10.0), Some("Medium"), None, Some("Checking")),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Totals include negative balances; nulls are skipped per column.
#[test]
fn overview_totals_and_rates() {
    let o = overview(&portfolio());

    assert_eq!(o.accounts, 4);
    assert!(close(o.total_balance, 3500.0));
    assert!(close(o.total_loan_amount, 350.0));
    assert!(close(o.total_net_flow, 40.0));
    assert!(close(o.avg_net_flow.unwrap(), 40.0 / 3.0));

    // (0.05*1000 + 0.01*3000 + 0.20*-500) / (1000 + 3000 - 500)
    assert!(close(o.weighted_avg_interest_rate.unwrap(), -20.0 / 3500.0));
}

/// Only rows with both a rate and a balance enter the weighted rate.
#[test]
fn weighted_rate_ignores_rows_missing_either_side() {
    let records = vec![
        account("a", Some(1000.0), Some(0.04), None, None, None, None, None),
        account("b", Some(9000.0), None, None, None, None, None, None),
        account("c", None, Some(0.50), None, None, None, None, None),
    ];
    let o = overview(&records);
    assert!(close(o.weighted_avg_interest_rate.unwrap(), 0.04));
    assert!(close(o.total_balance, 10_000.0));
}

/// A zero balance sum makes the weighted rate undefined, not zero.
#[test]
fn weighted_rate_undefined_when_balances_cancel() {
    let records = vec![
        account("a", Some(100.0), Some(0.05), None, None, None, None, None),
        account("b", Some(-100.0), Some(0.02), None, None, None, None, None),
    ];
    let o = overview(&records);
    assert_eq!(o.weighted_avg_interest_rate, None);
    assert_eq!(o.total_balance, 0.0);
}

#[test]
fn empty_set_has_zero_sums_and_undefined_averages() {
    let o = overview(&[]);
    assert_eq!(o.accounts, 0);
    assert_eq!(o.total_balance, 0.0);
    assert_eq!(o.total_loan_amount, 0.0);
    assert_eq!(o.total_net_flow, 0.0);
    assert_eq!(o.weighted_avg_interest_rate, None);
    assert_eq!(o.avg_net_flow, None);
}

#[test]
fn all_null_net_flow_gives_undefined_average() {
    let records = vec![account("a", Some(5.0), None, None, None, None, None, None)];
    let o = overview(&records);
    assert_eq!(o.accounts, 1);
    assert_eq!(o.avg_net_flow, None);
    assert_eq!(o.total_net_flow, 0.0);
}

/// Risk tiers follow Low, Medium, High; other tiers follow by name.
#[test]
fn risk_rollup_uses_domain_order() {
    let mut records = portfolio();
    records.push(account("e", Some(10.0), None, None, None, Some("Speculative"), None, None));
    records.push(account("f", Some(10.0), None, None, None, Some("Aggressive"), None, None));
    records.push(account("g", Some(10.0), None, None, None, None, None, None));

    let order = SegmentOrder::Domain(vec!["Low".into(), "Medium".into(), "High".into()]);
    let rows = segment_rollup(&records, Dimension::RiskTolerance, &order);
    let names: Vec<&str> = rows.iter().map(|r| r.segment.as_str()).collect();
    assert_eq!(names, vec!["Low", "Medium", "High", "Aggressive", "Speculative"]);

    let low = &rows[0];
    assert_eq!(low.accounts, 2);
    assert!(close(low.total_balance, 500.0));
    assert!(close(low.avg_balance.unwrap(), 250.0));
    assert!(close(low.total_loan_amount, 300.0));
    assert!(close(low.weighted_avg_interest_rate.unwrap(), -50.0 / 500.0));
    assert!(close(low.avg_net_flow.unwrap(), 50.0));

    // Medium has one account with a null balance.
    let medium = &rows[1];
    assert_eq!(medium.accounts, 1);
    assert_eq!(medium.total_balance, 0.0);
    assert_eq!(medium.avg_balance, None);
    assert_eq!(medium.weighted_avg_interest_rate, None);
}

/// Segment account counts add up to the records with a non-null group.
#[test]
fn rollup_counts_cover_non_null_groups() {
    let records = portfolio();
    let rows = segment_rollup(&records, Dimension::Region, &SegmentOrder::NetFlowDesc);
    let covered: u64 = rows.iter().map(|r| r.accounts).sum();
    assert_eq!(covered, 3);
}

#[test]
fn flow_breakdowns_sort_by_net_flow_descending() {
    let records = portfolio();

    let by_type = segment_rollup(&records, Dimension::AccountType, &SegmentOrder::NetFlowDesc);
    let names: Vec<&str> = by_type.iter().map(|r| r.segment.as_str()).collect();
    assert_eq!(names, vec!["Checking", "Savings"]);
    assert!(close(by_type[0].total_net_flow, 60.0));
    assert!(close(by_type[1].total_net_flow, -20.0));

    let by_region = segment_rollup(&records, Dimension::Region, &SegmentOrder::NetFlowDesc);
    let names: Vec<&str> = by_region.iter().map(|r| r.segment.as_str()).collect();
    assert_eq!(names, vec!["Northeast", "West"]);
}

#[test]
fn flow_ties_break_by_name() {
    let records = vec![
        account("a", None, None, None, Some(5.0), None, Some("West"), None),
        account("b", None, None, None, Some(5.0), None, Some("East"), None),
    ];
    let rows = segment_rollup(&records, Dimension::Region, &SegmentOrder::NetFlowDesc);
    assert_eq!(rows[0].segment, "East");
    assert_eq!(rows[1].segment, "West");
}
