//! Shared primitive types used across the analytics engine.

/// A metric that may be undefined (empty group, zero denominator).
/// `None` is the "no value" marker; it is never coerced to zero.
pub type Metric = Option<f64>;

/// Name of the snapshot table holding one row per customer account.
pub const ACCOUNT_TABLE: &str = "customer_account_metrics";

/// Turn a raw quotient into a metric, treating a zero or
/// non-finite denominator as undefined.
pub fn ratio(numerator: f64, denominator: f64) -> Metric {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let q = numerator / denominator;
    q.is_finite().then_some(q)
}
