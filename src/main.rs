mod binance;
mod config;
mod indicators;
mod monitor;
mod report;
mod server;
mod telegram;

use binance::BinanceClient;
use config::AppConfig;
use std::sync::Arc;
use telegram::TelegramNotifier;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing or malformed config is the only fatal error class.
    let config = Arc::new(AppConfig::load("config.json").await?);
    let market = BinanceClient::new(&config.binance_base_url)?;
    let notifier = TelegramNotifier::new(&config.telegram)?;

    if config.server.enabled {
        // Fire-and-forget: the loop shares nothing mutable with the server.
        let loop_config = config.clone();
        tokio::spawn(async move {
            monitor::run(loop_config, market, notifier).await;
        });
        server::serve(config.server.resolved_port()).await?;
    } else {
        monitor::run(config, market, notifier).await;
    }

    Ok(())
}
