//! Formatting boundary. Engines return plain numbers and `None`;
//! only this module decides how they read on screen.

use crate::{config::DashboardConfig, types::Metric};

#[derive(Debug, Clone)]
pub struct Formatter {
    currency_symbol: String,
    placeholder: String,
    rate_decimals: usize,
    share_decimals: usize,
    gini_decimals: usize,
}

impl Formatter {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            placeholder: config.placeholder.clone(),
            rate_decimals: config.rate_decimals,
            share_decimals: config.share_decimals,
            gini_decimals: config.gini_decimals,
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn defined(value: Metric) -> Option<f64> {
        value.filter(|v| v.is_finite())
    }

    /// Whole currency units with thousands separators, e.g. `$1,234`.
    pub fn money(&self, value: Metric) -> String {
        let Some(v) = Self::defined(value) else {
            return self.placeholder.clone();
        };
        let digits = group_thousands(&format!("{:.0}", v.abs()));
        // -0.4 rounds to "0"; do not print "-$0".
        if v < 0.0 && digits != "0" {
            format!("-{}{digits}", self.currency_symbol)
        } else {
            format!("{}{digits}", self.currency_symbol)
        }
    }

    /// An interest rate stored as a fraction, shown as a percentage.
    pub fn rate(&self, value: Metric) -> String {
        self.percent(value, self.rate_decimals)
    }

    /// A share in [0, 1], shown as a percentage.
    pub fn share(&self, value: Metric) -> String {
        self.percent(value, self.share_decimals)
    }

    fn percent(&self, value: Metric, decimals: usize) -> String {
        match Self::defined(value) {
            Some(v) => format!("{:.*}%", decimals, v * 100.0),
            None => self.placeholder.clone(),
        }
    }

    pub fn count(&self, value: u64) -> String {
        group_thousands(&value.to_string())
    }

    pub fn gini(&self, value: Metric) -> String {
        match Self::defined(value) {
            Some(v) => format!("{:.*}", self.gini_decimals, v),
            None => self.placeholder.clone(),
        }
    }

    pub fn decile_label(&self, decile: u8) -> String {
        format!("D{decile}")
    }
}

/// Insert `,` every three digits of the integer part of an unsigned
/// decimal string.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}
