//! Main entry point for the gate-sniper bot
//!
//! Runs one discovery pass, or keeps polling when `POLL_INTERVAL_SECS` is set.

use anyhow::{anyhow, Context, Result};
use gate_sniper::wallet::load_wallet;
use gate_sniper::{SniperConfig, SnipingOrchestrator};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting gate-sniper");

    let config = SniperConfig::from_env().context("Failed to load configuration")?;
    let wallet_source = config
        .wallet
        .as_ref()
        .ok_or_else(|| anyhow!("Set WALLET_KEYPAIR_PATH or WALLET_PRIVATE_KEY"))?;
    let wallet = load_wallet(wallet_source)?;

    let orchestrator = SnipingOrchestrator::from_config(&config, wallet)?;

    let Some(interval) = config.poll_interval() else {
        orchestrator.run_pass().await?;
        return Ok(());
    };

    info!("Polling every {}s, press Ctrl-C to stop", interval.as_secs());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };
    let passes = orchestrator.run_polling(interval, shutdown).await;
    info!("Stopped after {} passes", passes);

    Ok(())
}
