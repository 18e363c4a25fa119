//! Liquidation queue assembly and pagination.

use serde::Serialize;

use crate::account::LiquidationAccount;
use crate::risk::RiskLevel;
use crate::snapshot::SnapshotMap;

/// Accounts per page when no override is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sorted, paginated view over all classified accounts.
///
/// Most at-risk accounts first (ascending health factor). A queue is a pure
/// function of the snapshots it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidationQueue {
    accounts: Vec<LiquidationAccount>,
    page_size: usize,
}

/// Pagination metadata returned alongside a page slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number (clamped into range)
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Account counts per risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub liquidatable: usize,
    pub danger: usize,
    pub moderate: usize,
    pub safe: usize,
}

/// Build the liquidation queue from reduced snapshots.
pub fn build_queue(
    snapshots: &SnapshotMap,
    collateral_factor: f64,
    page_size: usize,
) -> LiquidationQueue {
    let mut accounts: Vec<LiquidationAccount> = snapshots
        .values()
        .map(|snapshot| LiquidationAccount::from_snapshot(snapshot, collateral_factor))
        .collect();

    accounts.sort_by(|a, b| a.health_factor.total_cmp(&b.health_factor));

    LiquidationQueue {
        accounts,
        page_size: page_size.max(1),
    }
}

impl LiquidationQueue {
    /// An empty queue (pre-first-sync state).
    pub fn empty(page_size: usize) -> Self {
        Self {
            accounts: Vec::new(),
            page_size: page_size.max(1),
        }
    }

    /// All accounts, ascending by health factor.
    pub fn accounts(&self) -> &[LiquidationAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.accounts.len().div_ceil(self.page_size)
    }

    /// One page of accounts, 1-based. Out-of-range pages clamp into range;
    /// an empty queue yields an empty page 1.
    pub fn page(&self, page: usize) -> (&[LiquidationAccount], PageInfo) {
        let total_pages = self.total_pages();
        let current_page = page.clamp(1, total_pages.max(1));

        let start = (current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.accounts.len());
        let slice = if start < self.accounts.len() {
            &self.accounts[start..end]
        } else {
            &[]
        };

        (
            slice,
            PageInfo {
                current_page,
                total_pages,
                total_items: self.accounts.len(),
            },
        )
    }

    /// Tier breakdown across the whole queue.
    pub fn risk_counts(&self) -> RiskCounts {
        let mut counts = RiskCounts::default();
        for account in &self.accounts {
            match account.risk_level {
                RiskLevel::Liquidatable => counts.liquidatable += 1,
                RiskLevel::Danger => counts.danger += 1,
                RiskLevel::Moderate => counts.moderate += 1,
                RiskLevel::Safe => counts.safe += 1,
            }
        }
        counts
    }
}
