//! Risk tier classification.
//!
//! One canonical threshold table, shared by the queue and any presentation
//! layer. Boundary values belong to the more severe tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health factor at or below which the liquidate action is enabled.
/// Distinct from the `Liquidatable` display tier, which starts at 0.5.
pub const LIQUIDATION_ACTION_HF: f64 = 1.0;

/// Discrete risk tier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// HF <= 0.5
    Liquidatable,
    /// HF <= 1.2 (both the <= 1.0 critical and <= 1.2 caution bands)
    Danger,
    /// HF <= 1.5
    Moderate,
    /// HF > 1.5
    Safe,
}

impl RiskLevel {
    /// Classify a health factor. First match wins, top down.
    pub fn classify(health_factor: f64) -> Self {
        if health_factor <= 0.5 {
            Self::Liquidatable
        } else if health_factor <= 1.2 {
            Self::Danger
        } else if health_factor <= 1.5 {
            Self::Moderate
        } else {
            Self::Safe
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Liquidatable => "liquidatable",
            Self::Danger => "danger",
            Self::Moderate => "moderate",
            Self::Safe => "safe",
        };
        f.write_str(label)
    }
}

/// Whether the liquidate action is enabled for a health factor.
pub fn can_liquidate(health_factor: f64) -> bool {
    health_factor <= LIQUIDATION_ACTION_HF
}
