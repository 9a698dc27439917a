//! Gini band classifier for the narrative line under the Lorenz chart.

use crate::types::Metric;
use serde::{Deserialize, Serialize};

/// Fixed band thresholds (lower bounds of Moderate, High, Extreme).
pub const MODERATE_FROM: f64 = 0.35;
pub const HIGH_FROM: f64 = 0.55;
pub const EXTREME_FROM: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiniBand {
    RelativelyEven,
    Moderate,
    High,
    Extreme,
    Unknown,
}

impl GiniBand {
    pub fn classify(gini: Metric) -> Self {
        match gini {
            Some(g) if g.is_nan() => Self::Unknown,
            Some(g) if g < MODERATE_FROM => Self::RelativelyEven,
            Some(g) if g < HIGH_FROM => Self::Moderate,
            Some(g) if g < EXTREME_FROM => Self::High,
            Some(_) => Self::Extreme,
            None => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RelativelyEven => "relatively even distribution",
            Self::Moderate => "moderate concentration",
            Self::High => "high concentration",
            Self::Extreme => "extreme concentration",
            Self::Unknown => "unknown",
        }
    }
}
