//! Risk monitor: fetch, reduce, classify, publish.
//!
//! Each sync fetches a fresh event window from the chain, rebuilds the
//! liquidation queue, and atomically replaces the published state. Syncs are
//! caller-triggered; the monitor runs no polling loop of its own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, instrument, warn};

use dorkfi_chain::{EventSource, FetchError};

use crate::account::LiquidationAccount;
use crate::config::NetworkConfig;
use crate::queue::{build_queue, LiquidationQueue};
use crate::snapshot::reduce_latest;

/// Error from one sync attempt. The previously published queue survives a
/// failed sync; callers retry manually.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("chain fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Result of one sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Chain round the event window was anchored to
    pub round: u64,
    /// Raw events fetched within the window
    pub events: usize,
    /// Accounts in the rebuilt queue
    pub accounts: usize,
    /// False when a newer sync published first and this result was discarded
    pub committed: bool,
}

struct PublishedState {
    queue: Arc<LiquidationQueue>,
    generation: u64,
}

/// Owns the published liquidation queue and the sync pipeline that refreshes
/// it.
pub struct RiskMonitor {
    source: Arc<dyn EventSource>,
    config: NetworkConfig,
    state: RwLock<PublishedState>,
    /// By-address lookup for the liquidate action path, rebuilt per commit
    index: DashMap<String, LiquidationAccount>,
    /// Generations handed out to sync attempts
    issued: AtomicU64,
}

impl RiskMonitor {
    /// Create a monitor over the given event source. The queue starts empty.
    pub fn new(source: Arc<dyn EventSource>, config: NetworkConfig) -> Self {
        let queue = Arc::new(LiquidationQueue::empty(config.page_size));
        Self {
            source,
            config,
            state: RwLock::new(PublishedState {
                queue,
                generation: 0,
            }),
            index: DashMap::new(),
            issued: AtomicU64::new(0),
        }
    }

    /// Run one sync cycle: current round, event window, reduce, rebuild,
    /// commit.
    ///
    /// Every attempt carries a monotonically increasing generation; a result
    /// only publishes if no newer attempt has published first, so a
    /// late-arriving response cannot overwrite fresher state.
    #[instrument(skip(self), fields(network = %self.config.name))]
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let round = self.source.current_round().await?;
        let min_round = self.config.min_round(round);
        let events = self.source.user_health_events(min_round).await?;
        let event_count = events.len();

        let snapshots = reduce_latest(events);
        let queue = build_queue(&snapshots, self.config.collateral_factor, self.config.page_size);
        let accounts = queue.len();

        let committed = self.commit(generation, Arc::new(queue));
        if committed {
            info!(
                round = round,
                min_round = min_round,
                events = event_count,
                accounts = accounts,
                "Sync committed"
            );
        } else {
            warn!(generation = generation, "Discarded stale sync result");
        }

        Ok(SyncOutcome {
            round,
            events: event_count,
            accounts,
            committed,
        })
    }

    /// Publish a rebuilt queue unless a newer generation already has.
    fn commit(&self, generation: u64, queue: Arc<LiquidationQueue>) -> bool {
        let mut state = self.state.write();
        if generation <= state.generation {
            return false;
        }
        state.generation = generation;
        state.queue = queue.clone();

        // Index swap stays under the state lock so reads through
        // `account()` always match the published queue.
        self.index.clear();
        for account in queue.accounts() {
            self.index
                .insert(account.wallet_address.clone(), account.clone());
        }

        true
    }

    /// Currently published queue.
    pub fn queue(&self) -> Arc<LiquidationQueue> {
        self.state.read().queue.clone()
    }

    /// Look up one account by wallet address.
    pub fn account(&self, wallet_address: &str) -> Option<LiquidationAccount> {
        self.index.get(wallet_address).map(|entry| entry.clone())
    }

    /// Network configuration this monitor was built with.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::DEFAULT_PAGE_SIZE;
    use crate::risk::RiskLevel;
    use async_trait::async_trait;
    use dorkfi_chain::UserHealthEvent;

    struct CannedSource {
        round: u64,
        events: Vec<UserHealthEvent>,
        fail: std::sync::atomic::AtomicBool,
    }

    impl CannedSource {
        fn new(round: u64, events: Vec<UserHealthEvent>) -> Arc<Self> {
            Arc::new(Self {
                round,
                events,
                fail: std::sync::atomic::AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl EventSource for CannedSource {
        async fn current_round(&self) -> Result<u64, FetchError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Status {
                    status: 503,
                    endpoint: "/health",
                });
            }
            Ok(self.round)
        }

        async fn user_health_events(
            &self,
            _min_round: u64,
        ) -> Result<Vec<UserHealthEvent>, FetchError> {
            Ok(self.events.clone())
        }
    }

    fn event(user: &str, timestamp: u64, collateral: f64, borrow: f64) -> UserHealthEvent {
        UserHealthEvent {
            round: timestamp / 10,
            timestamp,
            user_id: user.to_string(),
            total_collateral_value: collateral,
            total_borrow_value: borrow,
        }
    }

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            name: "test".to_string(),
            indexer_url: "http://localhost:8980".to_string(),
            app_id: 1,
            event_window_rounds: 2_000_000,
            collateral_factor: 0.8,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[tokio::test]
    async fn test_sync_end_to_end() {
        let source = CannedSource::new(
            9_000_000,
            vec![
                // Stale observation superseded by the later one
                event("ALICE", 100, 50.0, 40.0),
                event("ALICE", 200, 8.0, 4.0),
                event("BOB", 150, 1.0, 10.0),
            ],
        );
        let monitor = RiskMonitor::new(source, test_config());

        let outcome = monitor.sync().await.unwrap();
        assert!(outcome.committed);
        assert_eq!(outcome.round, 9_000_000);
        assert_eq!(outcome.events, 3);
        assert_eq!(outcome.accounts, 2);

        let queue = monitor.queue();
        assert_eq!(queue.accounts()[0].wallet_address, "BOB");
        assert_eq!(queue.accounts()[0].risk_level, RiskLevel::Liquidatable);

        // Reduced to ALICE's latest state, not her first
        let alice = monitor.account("ALICE").unwrap();
        assert!((alice.health_factor - 1.6).abs() < 1e-9);
        assert_eq!(alice.risk_level, RiskLevel::Safe);
    }

    #[tokio::test]
    async fn test_failed_sync_keeps_previous_queue() {
        let source = CannedSource::new(100, vec![event("ALICE", 100, 8.0, 4.0)]);
        let monitor = RiskMonitor::new(source.clone(), test_config());

        monitor.sync().await.unwrap();
        assert_eq!(monitor.queue().len(), 1);

        source.fail.store(true, Ordering::SeqCst);
        assert!(matches!(
            monitor.sync().await,
            Err(SyncError::Fetch(FetchError::Status { status: 503, .. }))
        ));

        // Degraded state: the previously published queue survives
        assert_eq!(monitor.queue().len(), 1);
        assert!(monitor.account("ALICE").is_some());
    }

    #[tokio::test]
    async fn test_empty_window_is_valid_state() {
        let source = CannedSource::new(500, Vec::new());
        let monitor = RiskMonitor::new(source, test_config());

        let outcome = monitor.sync().await.unwrap();
        assert!(outcome.committed);
        assert_eq!(outcome.accounts, 0);
        assert!(monitor.queue().is_empty());
    }

    #[test]
    fn test_stale_generation_discarded() {
        let source = CannedSource::new(0, Vec::new());
        let monitor = RiskMonitor::new(source, test_config());

        let newer = {
            let snaps = reduce_latest(vec![event("NEW", 10, 8.0, 4.0)]);
            Arc::new(build_queue(&snaps, 0.8, DEFAULT_PAGE_SIZE))
        };
        let older = {
            let snaps = reduce_latest(vec![event("OLD", 5, 1.0, 10.0)]);
            Arc::new(build_queue(&snaps, 0.8, DEFAULT_PAGE_SIZE))
        };

        // Generation 2 publishes first; the superseded generation 1 arrives
        // late and must be dropped.
        assert!(monitor.commit(2, newer));
        assert!(!monitor.commit(1, older));

        let queue = monitor.queue();
        assert_eq!(queue.accounts()[0].wallet_address, "NEW");
        assert!(monitor.account("OLD").is_none());
        assert!(monitor.account("NEW").is_some());
    }
}
