//! DorkFi Liquidation Monitor
//!
//! Risk monitor for the DorkFi lending pool on the Voi network.
//! Features:
//! - UserHealth event ingestion over the events indexer REST API
//! - Latest-state reduction and health factor classification
//! - Risk-sorted, paginated liquidation queue
//!
//! One invocation performs one sync; a failed fetch leaves no partial state
//! and exits non-zero. There is no automatic retry or polling.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dorkfi_chain::IndexerClient;
use dorkfi_core::{NetworkConfig, RiskMonitor};

#[tokio::main]
async fn main() -> Result<()> {
    // Print startup banner
    print_banner();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dorkfi_core=debug,dorkfi_chain=debug")),
        )
        .init();

    // Resolve network deployment (DORKFI_NETWORK: preset name or TOML path)
    let config = NetworkConfig::from_env()?;
    info!(
        network = %config.name,
        indexer = %config.indexer_url,
        app_id = config.app_id,
        "Starting DorkFi liquidation monitor"
    );

    let indexer = Arc::new(IndexerClient::new(&config.indexer_url, config.app_id));
    let monitor = RiskMonitor::new(indexer, config);

    let outcome = monitor.sync().await?;
    info!(
        round = outcome.round,
        events = outcome.events,
        accounts = outcome.accounts,
        "Sync complete"
    );

    render_queue(&monitor);

    Ok(())
}

/// Print the first page of the liquidation queue as a table.
fn render_queue(monitor: &RiskMonitor) {
    let queue = monitor.queue();

    if queue.is_empty() {
        println!("\nNo accounts in the liquidation window.");
        return;
    }

    let (accounts, page) = queue.page(1);
    let counts = queue.risk_counts();

    println!();
    println!(
        "{:<16} {:>8} {:>9} {:>12} {:>12} {:>8}  {:<13} {}",
        "ACCOUNT", "HF", "MARGIN%", "SUPPLIED", "BORROWED", "LTV%", "RISK", "UPDATED"
    );
    for account in accounts {
        println!(
            "{:<16} {:>8.3} {:>9.1} {:>12.2} {:>12.2} {:>8.1}  {:<13} {}",
            short_address(&account.wallet_address),
            account.health_factor,
            account.liquidation_margin,
            account.total_supplied,
            account.total_borrowed,
            account.ltv,
            account.risk_level.to_string(),
            account.last_updated,
        );
    }
    println!();
    println!(
        "page {}/{}, {} accounts ({} liquidatable, {} danger, {} moderate, {} safe)",
        page.current_page,
        page.total_pages,
        page.total_items,
        counts.liquidatable,
        counts.danger,
        counts.moderate,
        counts.safe
    );
}

/// Shorten a 58-character Voi address for table display.
fn short_address(address: &str) -> String {
    if address.len() > 14 {
        format!("{}...{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}

/// Print startup banner.
fn print_banner() {
    println!(
        r#"
    ╔╦╗┌─┐┬─┐┬┌─╔═╗┬
     ║║│ │├┬┘├┴┐╠╣ │
    ═╩╝└─┘┴└─┴ ┴╚  ┴
    Liquidation Monitor v0.1.0
    "#
    );
}
