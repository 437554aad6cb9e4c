//! The polling loop: fetch the symbol × timeframe grid, render a report,
//! deliver it, sleep, repeat.

use crate::binance::BinanceClient;
use crate::config::AppConfig;
use crate::indicators;
use crate::report::{self, FrameIndicators, FrameReport, SymbolReport};
use crate::telegram::TelegramNotifier;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Runs forever. Each cycle always ends in a full sleep interval, no matter
/// how many individual fetches or the delivery itself failed.
pub async fn run(config: Arc<AppConfig>, market: BinanceClient, notifier: TelegramNotifier) {
    let interval = Duration::from_secs(config.poll_interval_secs);

    loop {
        let reports = collect_reports(&config, &market).await;
        let now = Utc::now().with_timezone(&config.report_offset());
        let text = report::render(&reports, now);

        match notifier.send(&text).await {
            Ok(()) => info!("report delivered, sleeping {}s", interval.as_secs()),
            Err(e) => warn!("report delivery failed: {e:#}"),
        }

        tokio::time::sleep(interval).await;
    }
}

/// Walks the configured grid strictly sequentially, one request in flight
/// at a time. Fetch failures are logged here and become absent values;
/// nothing below this layer can abort a cycle.
async fn collect_reports(config: &AppConfig, market: &BinanceClient) -> Vec<SymbolReport> {
    let mut reports = Vec::with_capacity(config.symbols.len());

    for symbol in &config.symbols {
        let price = match market.current_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("price lookup failed for {symbol}: {e:#}");
                None
            }
        };

        let mut frames = Vec::with_capacity(config.timeframes.len());
        for timeframe in &config.timeframes {
            let frame = match market.klines(symbol, timeframe, config.kline_limit).await {
                Ok(candles) => Some(FrameIndicators {
                    rsi: indicators::rsi(&candles, config.rsi_period),
                    atr_percent: indicators::atr_percent(&candles, config.atr_period),
                }),
                Err(e) => {
                    warn!("kline fetch failed for {symbol} {timeframe}: {e:#}");
                    None
                }
            };
            frames.push(FrameReport {
                timeframe: timeframe.clone(),
                indicators: frame,
            });
        }

        reports.push(SymbolReport {
            symbol: symbol.clone(),
            price,
            frames,
        });
    }

    reports
}
