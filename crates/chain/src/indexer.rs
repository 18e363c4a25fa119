//! HTTP client for the Voi events indexer.
//!
//! The indexer exposes the pool contract's event log over REST:
//! - `/health` reports the latest round the indexer has caught up to
//! - `/v2/events` returns decoded application logs as positional tuples,
//!   filtered by application id, event name, and a minimum round
//!
//! Responses are paginated with an opaque `next-token`; pages are fetched
//! sequentially until the token runs out.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::events::{decode_user_health, DecodeError, UserHealthEvent};

/// Event name filter for pool health logs.
pub const USER_HEALTH_EVENT: &str = "UserHealth";

/// Maximum events requested per page.
const PAGE_LIMIT: usize = 1000;

/// Error fetching data from the indexer.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("indexer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("indexer returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: &'static str },

    #[error("malformed event in indexer response: {0}")]
    Decode(#[from] DecodeError),
}

/// Source of chain state for the risk pipeline.
///
/// The production implementation is [`IndexerClient`]; tests substitute a
/// canned source.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Latest round the source has observed.
    async fn current_round(&self) -> Result<u64, FetchError>;

    /// All `UserHealth` events confirmed at or after `min_round`.
    async fn user_health_events(&self, min_round: u64) -> Result<Vec<UserHealthEvent>, FetchError>;
}

/// Events indexer REST client.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    client: reqwest::Client,
    base_url: String,
    app_id: u64,
}

impl IndexerClient {
    /// Create a client for the given indexer endpoint and pool application.
    pub fn new(base_url: impl Into<String>, app_id: u64) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
        }
    }

    /// Pool application id this client queries.
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    async fn fetch_events_page(
        &self,
        min_round: u64,
        next: Option<&str>,
    ) -> Result<EventsResponse, FetchError> {
        let url = format!("{}/v2/events", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("application-id", self.app_id.to_string()),
            ("name", USER_HEALTH_EVENT.to_string()),
            ("min-round", min_round.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        if let Some(token) = next {
            query.push(("next", token.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                endpoint: "/v2/events",
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl EventSource for IndexerClient {
    #[instrument(skip(self))]
    async fn current_round(&self) -> Result<u64, FetchError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                endpoint: "/health",
            });
        }

        let health: HealthResponse = response.json().await?;
        debug!(round = health.round, "Indexer health");

        Ok(health.round)
    }

    #[instrument(skip(self))]
    async fn user_health_events(&self, min_round: u64) -> Result<Vec<UserHealthEvent>, FetchError> {
        let mut events = Vec::new();
        let mut next: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self.fetch_events_page(min_round, next.as_deref()).await?;
            let fetched = page.events.len();
            pages += 1;

            for raw in &page.events {
                events.push(decode_user_health(raw)?);
            }

            debug!(page = pages, fetched = fetched, total_so_far = events.len(), "Fetched events page");

            match page.next_token {
                Some(token) if fetched == PAGE_LIMIT => next = Some(token),
                _ => break,
            }
        }

        info!(
            app_id = self.app_id,
            min_round = min_round,
            pages = pages,
            count = events.len(),
            "Fetched UserHealth events"
        );

        Ok(events)
    }
}

/// Indexer `/health` response (round only; remaining fields are ignored).
#[derive(Debug, Deserialize)]
struct HealthResponse {
    round: u64,
}

/// Paginated `/v2/events` response.
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<Vec<Value>>,

    #[serde(rename = "next-token")]
    next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_health() {
        // Captured from the Voi mainnet indexer
        let json = r#"{
            "data-round": 9168429,
            "db-available": true,
            "is-migrating": false,
            "message": "9168429",
            "round": 9168429,
            "version": "3.5.0"
        }"#;

        let health: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(health.round, 9_168_429);
    }

    #[test]
    fn test_deserialize_events_page() {
        let json = r#"{
            "events": [
                ["TX1", 7100000, 1717000000, "ADDRONE", 950000000000, "12000000000000", "9000000000000"],
                ["TX2", 7100001, 1717000060, "ADDRTWO", 0, 8000000000000, 0]
            ],
            "next-token": "b64:CgwI"
        }"#;

        let page: EventsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.events.len(), 2);
        assert_eq!(page.next_token.as_deref(), Some("b64:CgwI"));

        let first = decode_user_health(&page.events[0]).unwrap();
        assert_eq!(first.user_id, "ADDRONE");
        assert!((first.total_collateral_value - 12.0).abs() < 1e-9);
        assert!((first.total_borrow_value - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_final_page() {
        let json = r#"{ "events": [] }"#;
        let page: EventsResponse = serde_json::from_str(json).unwrap();
        assert!(page.events.is_empty());
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_base_url_normalized() {
        let client = IndexerClient::new("https://indexer.voi.network/", 40425710);
        assert_eq!(client.base_url, "https://indexer.voi.network");
        assert_eq!(client.app_id(), 40425710);
    }
}
