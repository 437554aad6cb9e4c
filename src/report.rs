use chrono::{DateTime, FixedOffset};

// --- Report input model ---

/// Indicator pair for one timeframe. `None` fields mean the value could
/// not be computed, not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameIndicators {
    pub rsi: Option<f64>,
    pub atr_percent: Option<f64>,
}

/// One timeframe line. `indicators: None` means the candle fetch itself
/// failed and the line renders the load-error marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub timeframe: String,
    pub indicators: Option<FrameIndicators>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReport {
    pub symbol: String,
    pub price: Option<f64>,
    pub frames: Vec<FrameReport>,
}

// --- Rendering ---

/// Assembles the Telegram message for one polling cycle.
///
/// Deterministic: the timestamp is supplied by the caller, and identical
/// inputs always produce the identical string.
pub fn render(reports: &[SymbolReport], now: DateTime<FixedOffset>) -> String {
    let mut message = String::new();
    message.push_str("📊 *RSI & ATR% Monitor*\n");
    message.push_str(&format!("🕒 Time: `{}`\n\n", now.format("%Y-%m-%d %H:%M")));

    for report in reports {
        let price = report
            .price
            .map(format_price)
            .unwrap_or_else(|| "n/a".to_string());
        message.push_str(&format!("🔸 *{}* | 💰 *{} $*\n", report.symbol, price));
        message.push_str("───────────────\n");

        for frame in &report.frames {
            match &frame.indicators {
                Some(indicators) => {
                    let rsi = indicators
                        .rsi
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "n/a".to_string());
                    let atr = indicators
                        .atr_percent
                        .map(|v| format!("{}%", v))
                        .unwrap_or_else(|| "n/a".to_string());
                    message.push_str(&format!(
                        "🕐 {:<4} | RSI: {:<5} | ATR: {}\n",
                        frame.timeframe, rsi, atr
                    ));
                }
                None => {
                    message.push_str(&format!(
                        "🕐 {:<4} | ❌ Failed to load data\n",
                        frame.timeframe
                    ));
                }
            }
        }
        message.push('\n');
    }

    message
}

/// Prices are shown with at most 4 decimals, without trailing zeros.
fn format_price(price: f64) -> String {
    let rounded = (price * 10_000.0).round() / 10_000.0;
    rounded.to_string()
}
