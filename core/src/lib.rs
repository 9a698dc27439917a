//! Wealth-distribution and portfolio-concentration analytics over a
//! snapshot of customer account records.

pub mod concentration;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod narrative;
pub mod present;
pub mod record;
pub mod rng;
pub mod source;
pub mod store;
pub mod synthetic;
pub mod types;
