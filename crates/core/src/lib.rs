//! DorkFi liquidation risk engine.
//!
//! This crate provides the core risk pipeline:
//! - Latest-state reduction over pool `UserHealth` events
//! - Health factor and LTV computation with collateral weighting
//! - Discrete risk tier classification
//! - Sorted, paginated liquidation queue assembly
//! - A sync monitor that atomically publishes each rebuilt queue
//!
//! All computation is pure and synchronous; the only suspension points are
//! the chain fetches behind the `EventSource` seam in `dorkfi-chain`.

mod account;
pub mod config;
mod health;
mod monitor;
mod queue;
mod risk;
mod snapshot;

pub use account::LiquidationAccount;
pub use config::NetworkConfig;
pub use health::{compute_health, HealthMetrics, DEFAULT_COLLATERAL_FACTOR, HEALTH_FACTOR_CAP};
pub use monitor::{RiskMonitor, SyncError, SyncOutcome};
pub use queue::{build_queue, LiquidationQueue, PageInfo, RiskCounts, DEFAULT_PAGE_SIZE};
pub use risk::{can_liquidate, RiskLevel, LIQUIDATION_ACTION_HF};
pub use snapshot::{reduce_latest, SnapshotMap};
