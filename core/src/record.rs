//! Account record and categorical dimensions.
//!
//! Records are a read-only snapshot owned by the record store.
//! Every metric and category column is nullable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    /// Signed; negative for overdrawn accounts.
    pub balance: Option<f64>,
    pub loan_amount: Option<f64>,
    /// Fraction, e.g. 0.045 = 4.5%.
    pub interest_rate: Option<f64>,
    /// Deposits minus withdrawals over the measurement window.
    pub net_flow: Option<f64>,
    pub risk_tolerance: Option<String>,
    pub region: Option<String>,
    pub account_type: Option<String>,
}

impl AccountRecord {
    /// Record with only an id set. Used by tests and the generator.
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            balance: None,
            loan_amount: None,
            interest_rate: None,
            net_flow: None,
            risk_tolerance: None,
            region: None,
            account_type: None,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_category(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match dimension {
            Dimension::RiskTolerance => self.risk_tolerance = value,
            Dimension::Region => self.region = value,
            Dimension::AccountType => self.account_type = value,
        }
        self
    }

    pub fn category(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::RiskTolerance => self.risk_tolerance.as_deref(),
            Dimension::Region => self.region.as_deref(),
            Dimension::AccountType => self.account_type.as_deref(),
        }
    }
}

/// The three filterable categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    RiskTolerance,
    Region,
    AccountType,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::RiskTolerance,
        Dimension::Region,
        Dimension::AccountType,
    ];

    /// Column name in the account table. Fixed, never user-supplied.
    pub fn column(&self) -> &'static str {
        match self {
            Self::RiskTolerance => "risk_tolerance",
            Self::Region => "region",
            Self::AccountType => "account_type",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RiskTolerance => "Risk tolerance",
            Self::Region => "Region",
            Self::AccountType => "Account type",
        }
    }
}
