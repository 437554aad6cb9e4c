use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

// Binance kline rows are positional arrays:
// [openTime, open, high, low, close, volume, closeTime, ...]
// Only the first six fields are consumed; price fields arrive as strings.

const PRICE_TIMEOUT: Duration = Duration::from_secs(5);
const KLINES_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Deserialize)]
struct TickerPrice {
    price: String,
}

pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Last traded price for a symbol.
    pub async fn current_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .timeout(PRICE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let ticker: TickerPrice = response.json().await?;
        let price = ticker.price.trim().parse::<f64>()?;
        Ok(price)
    }

    /// Most recent candles for a symbol/interval pair, oldest first.
    pub async fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let query = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&query)
            .timeout(KLINES_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let raw_klines: Vec<Vec<Value>> = response.json().await?;
        let candles = parse_klines(raw_klines);
        anyhow::ensure!(
            !candles.is_empty(),
            "empty kline response for {} {}",
            symbol,
            interval
        );
        Ok(candles)
    }
}

/// Converts raw positional kline rows into candles, skipping rows with
/// missing or unparsable fields.
pub fn parse_klines(raw_klines: Vec<Vec<Value>>) -> Vec<Candle> {
    raw_klines.into_iter().filter_map(parse_kline_row).collect()
}

fn parse_kline_row(row: Vec<Value>) -> Option<Candle> {
    if row.len() < 6 {
        return None;
    }
    Some(Candle {
        open_time: row[0].as_i64()?,
        open: lenient_f64(&row[1])?,
        high: lenient_f64(&row[2])?,
        low: lenient_f64(&row[3])?,
        close: lenient_f64(&row[4])?,
        volume: lenient_f64(&row[5])?,
    })
}

/// Accepts a float, an integer, or a string representing a number.
/// Blank or malformed values yield `None`.
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row(open_time: i64, close: &str) -> Vec<Value> {
        vec![
            json!(open_time),
            json!("100.0"),
            json!("110.5"),
            json!("95.25"),
            json!(close),
            json!("1234.5"),
            json!(open_time + 59_999),
            json!("0"),
            json!(42),
            json!("0"),
            json!("0"),
            json!("0"),
        ]
    }

    #[test]
    fn parses_positional_rows() {
        let candles = parse_klines(vec![sample_row(1_700_000_000_000, "105.75")]);
        assert_eq!(candles.len(), 1);
        let candle = &candles[0];
        assert_eq!(candle.open_time, 1_700_000_000_000);
        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.high, 110.5);
        assert_eq!(candle.low, 95.25);
        assert_eq!(candle.close, 105.75);
        assert_eq!(candle.volume, 1234.5);
    }

    #[test]
    fn accepts_numeric_fields_without_quotes() {
        let row = vec![
            json!(1_700_000_000_000_i64),
            json!(100),
            json!(110.5),
            json!(95.25),
            json!(105.75),
            json!(1234.5),
        ];
        let candles = parse_klines(vec![row]);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, 100.0);
        assert_eq!(candles[0].close, 105.75);
    }

    #[test]
    fn skips_malformed_rows() {
        let bad_close = sample_row(1_700_000_000_000, "not-a-number");
        let short_row = vec![json!(1_700_000_060_000_i64), json!("100.0")];
        let blank_field = {
            let mut row = sample_row(1_700_000_120_000, "101.0");
            row[2] = json!("  ");
            row
        };
        let good = sample_row(1_700_000_180_000, "102.0");

        let candles = parse_klines(vec![bad_close, short_row, blank_field, good]);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open_time, 1_700_000_180_000);
    }

    #[test]
    fn empty_payload_yields_no_candles() {
        assert!(parse_klines(Vec::new()).is_empty());
    }
}
