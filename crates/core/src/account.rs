//! Account-level risk view assembled from a position snapshot.

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

use dorkfi_chain::UserHealthEvent;

use crate::health::compute_health;
use crate::risk::{can_liquidate, RiskLevel};

/// One row of the liquidation queue.
///
/// Rebuilt wholesale on every sync; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidationAccount {
    /// On-chain account address
    pub wallet_address: String,
    /// Health factor, capped at the display ceiling
    pub health_factor: f64,
    /// Buffer above the liquidation threshold, in percent (floored at 0)
    pub liquidation_margin: f64,
    /// Total supplied value, USD
    pub total_supplied: f64,
    /// Total borrowed value, USD
    pub total_borrowed: f64,
    /// Borrow value as a percentage of supplied value
    pub ltv: f64,
    /// Risk tier
    pub risk_level: RiskLevel,
    /// Snapshot timestamp, RFC 3339
    pub last_updated: String,
}

impl LiquidationAccount {
    /// Build the risk view for one snapshot.
    pub fn from_snapshot(snapshot: &UserHealthEvent, collateral_factor: f64) -> Self {
        let metrics = compute_health(
            snapshot.total_collateral_value,
            snapshot.total_borrow_value,
            collateral_factor,
        );

        Self {
            wallet_address: snapshot.user_id.clone(),
            health_factor: metrics.health_factor,
            liquidation_margin: ((metrics.health_factor - 1.0) * 100.0).max(0.0),
            total_supplied: snapshot.total_collateral_value,
            total_borrowed: snapshot.total_borrow_value,
            ltv: metrics.ltv,
            risk_level: RiskLevel::classify(metrics.health_factor),
            last_updated: format_timestamp(snapshot.timestamp),
        }
    }

    /// Whether the liquidate action is enabled for this account.
    pub fn can_liquidate(&self) -> bool {
        can_liquidate(self.health_factor)
    }
}

fn format_timestamp(secs: u64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| secs.to_string())
}
