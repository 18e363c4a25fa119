//! Health factor and loan-to-value computation.

/// Display ceiling for health factors. Positions with no debt report this
/// value directly.
pub const HEALTH_FACTOR_CAP: f64 = 3.0;

/// Flat collateral weighting applied to supplied value. The pool tracks
/// per-asset liquidation thresholds on-chain; the risk queue uses this
/// single approximation for every account.
pub const DEFAULT_COLLATERAL_FACTOR: f64 = 0.8;

/// Derived health metrics for one position snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthMetrics {
    /// Weighted collateral over borrow, capped at [`HEALTH_FACTOR_CAP`]
    pub health_factor: f64,
    /// Borrow value as a percentage of collateral value
    pub ltv: f64,
}

/// Compute health factor and LTV for a position.
///
/// - No debt: health factor is the cap sentinel, LTV is 0.
/// - Debt with no collateral: health factor is 0.
/// - Otherwise `min(cap, collateral * factor / borrow)`.
pub fn compute_health(
    total_collateral_value: f64,
    total_borrow_value: f64,
    collateral_factor: f64,
) -> HealthMetrics {
    let health_factor = if total_borrow_value == 0.0 {
        HEALTH_FACTOR_CAP
    } else if total_collateral_value == 0.0 {
        0.0
    } else {
        let weighted = total_collateral_value * collateral_factor;
        (weighted / total_borrow_value).min(HEALTH_FACTOR_CAP)
    };

    let ltv = if total_collateral_value > 0.0 {
        (total_borrow_value / total_collateral_value) * 100.0
    } else {
        0.0
    };

    HealthMetrics { health_factor, ltv }
}
