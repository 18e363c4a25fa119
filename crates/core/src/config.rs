//! Network configuration for the risk monitor.
//!
//! Each supported deployment (Voi mainnet, Voi testnet, or a custom TOML
//! file) resolves to one [`NetworkConfig`] value. The config is passed
//! explicitly to every consumer; there is no process-global network state.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one DorkFi deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name (for logging)
    pub name: String,

    /// Events indexer base URL
    pub indexer_url: String,

    /// Pool application id
    pub app_id: u64,

    /// Rolling event window, in rounds behind the current round
    #[serde(default = "default_event_window")]
    pub event_window_rounds: u64,

    /// Flat collateral weighting applied to supplied value
    #[serde(default = "default_collateral_factor")]
    pub collateral_factor: f64,

    /// Accounts per liquidation queue page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_event_window() -> u64 {
    2_000_000
}

fn default_collateral_factor() -> f64 {
    0.8
}

fn default_page_size() -> usize {
    10
}

impl NetworkConfig {
    /// Voi mainnet deployment.
    pub fn voi_mainnet() -> Self {
        Self {
            name: "voi-mainnet".to_string(),
            indexer_url: "https://mainnet-idx.voi.nodely.dev".to_string(),
            app_id: 40_425_710,
            event_window_rounds: default_event_window(),
            collateral_factor: default_collateral_factor(),
            page_size: default_page_size(),
        }
    }

    /// Voi testnet deployment.
    pub fn voi_testnet() -> Self {
        Self {
            name: "voi-testnet".to_string(),
            indexer_url: "https://testnet-idx.voi.nodely.dev".to_string(),
            app_id: 26_167_295,
            event_window_rounds: default_event_window(),
            collateral_factor: default_collateral_factor(),
            page_size: default_page_size(),
        }
    }

    /// Load a deployment config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: NetworkConfig = toml::from_str(&content)?;
        config.expand_env_vars();
        Ok(config)
    }

    /// Resolve a config from the `DORKFI_NETWORK` environment variable:
    /// a preset name (`mainnet`, `testnet`) or a path to a TOML file.
    /// Defaults to mainnet when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("DORKFI_NETWORK") {
            Ok(value) => Self::resolve(&value),
            Err(_) => Ok(Self::voi_mainnet()),
        }
    }

    fn resolve(value: &str) -> anyhow::Result<Self> {
        match value {
            "mainnet" | "voi-mainnet" => Ok(Self::voi_mainnet()),
            "testnet" | "voi-testnet" => Ok(Self::voi_testnet()),
            path => Self::from_file(path),
        }
    }

    /// Lower bound for event queries given the current round.
    pub fn min_round(&self, current_round: u64) -> u64 {
        current_round.saturating_sub(self.event_window_rounds)
    }

    /// Expand `${VAR_NAME}` patterns in URL values.
    pub fn expand_env_vars(&mut self) {
        self.indexer_url = expand_env(&self.indexer_url);
    }
}

/// Expand `${VAR_NAME}` patterns with environment variable values.
fn expand_env(s: &str) -> String {
    let mut result = s.to_string();
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}").unwrap();

    for cap in re.captures_iter(s) {
        if let (Some(full_match), Some(var_match)) = (cap.get(0), cap.get(1)) {
            let var_name = var_match.as_str();
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(full_match.as_str(), &value);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let toml = r#"
            name = "local"
            indexer_url = "http://localhost:8980"
            app_id = 1234
        "#;

        let config: NetworkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.event_window_rounds, 2_000_000);
        assert!((config.collateral_factor - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_min_round_window() {
        let config = NetworkConfig::voi_mainnet();
        assert_eq!(config.min_round(9_000_000), 7_000_000);
        // Saturates instead of underflowing on young chains
        assert_eq!(config.min_round(1_500), 0);
    }

    #[test]
    fn test_expand_env() {
        // Use unique var name to avoid conflicts with parallel tests
        std::env::set_var("NETWORK_TEST_VAR", "indexer.example.com");
        assert_eq!(expand_env("https://${NETWORK_TEST_VAR}"), "https://indexer.example.com");
        assert_eq!(expand_env("no_vars"), "no_vars");
        std::env::remove_var("NETWORK_TEST_VAR");
    }

    #[test]
    fn test_preset_resolution() {
        assert_eq!(NetworkConfig::resolve("testnet").unwrap().name, "voi-testnet");
        assert_eq!(NetworkConfig::resolve("voi-mainnet").unwrap().name, "voi-mainnet");
        assert!(NetworkConfig::resolve("/nonexistent/deployment.toml").is_err());
    }
}
