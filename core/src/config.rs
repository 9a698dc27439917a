use crate::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path (or SQLite URI) of the account database.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Shown wherever a metric is undefined.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_two")]
    pub rate_decimals: usize,
    #[serde(default = "default_two")]
    pub share_decimals: usize,
    #[serde(default = "default_three")]
    pub gini_decimals: usize,
    /// Row order of the risk segmentation table. Unlisted tiers follow.
    #[serde(default = "default_risk_order")]
    pub risk_order: Vec<String>,
}

fn default_db_path() -> String {
    "fintech.db".into()
}

fn default_currency_symbol() -> String {
    "$".into()
}

fn default_placeholder() -> String {
    "—".into()
}

fn default_two() -> usize {
    2
}

fn default_three() -> usize {
    3
}

fn default_risk_order() -> Vec<String> {
    vec!["Low".into(), "Medium".into(), "High".into()]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            currency_symbol: default_currency_symbol(),
            placeholder: default_placeholder(),
            rate_decimals: default_two(),
            share_decimals: default_two(),
            gini_decimals: default_three(),
            risk_order: default_risk_order(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> AnalyticsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalyticsError::Config {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&content).map_err(|e| AnalyticsError::Config {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        if config.risk_order.iter().any(|r| r.trim().is_empty()) {
            return Err(AnalyticsError::Config {
                path: path.to_string(),
                message: "risk_order entries must be non-empty".into(),
            });
        }
        Ok(config)
    }

    /// Config with hardcoded defaults and an in-memory database.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".into(),
            ..Self::default()
        }
    }
}
