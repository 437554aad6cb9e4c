use anyhow::Context;
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

// CONFIGURATION STRUCTS
// Deserialized straight from config.json without manual parsing.

#[derive(Deserialize, Debug)]
pub struct TelegramConfig {
    pub token: String,   // bot token from @BotFather
    pub chat_id: String, // destination chat or channel id
}

#[derive(Deserialize, Debug)]
pub struct ServerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Port to bind, with the hosting platform's `PORT` variable taking
    /// precedence over the configured value.
    pub fn resolved_port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.port)
    }
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    // Nested structs organize the config logically
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    // Report order follows list order for both symbols and timeframes.
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<String>,

    #[serde(default = "default_period")]
    pub rsi_period: usize,
    #[serde(default = "default_period")]
    pub atr_period: usize,
    #[serde(default = "default_kline_limit")]
    pub kline_limit: u32,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    // Offset applied to the report timestamp only; 0 renders UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,
}

fn default_symbols() -> Vec<String> {
    ["BTCUSDT", "XRPUSDT", "ADAUSDT", "LINKUSDT"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeframes() -> Vec<String> {
    ["1m", "5m", "15m", "1h", "1d"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_period() -> usize {
    14
}

fn default_kline_limit() -> u32 {
    100
}

fn default_poll_interval() -> u64 {
    15 * 60
}

fn default_port() -> u16 {
    8080
}

fn default_binance_base_url() -> String {
    "https://api.binance.com".to_string()
}

impl AppConfig {
    /// Reads and validates the config file. Any failure here is fatal:
    /// the process must not enter the polling loop without credentials.
    pub async fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)
            .await
            .with_context(|| format!("could not read config file {:?}", path))?;
        Self::from_slice(&content)
            .with_context(|| format!("invalid config file {:?}", path))
    }

    /// Parses raw JSON bytes into a validated config.
    pub fn from_slice(content: &[u8]) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_slice(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.telegram.token.is_empty(), "telegram.token is empty");
        anyhow::ensure!(
            !self.telegram.chat_id.is_empty(),
            "telegram.chat_id is empty"
        );
        anyhow::ensure!(!self.symbols.is_empty(), "symbols list is empty");
        anyhow::ensure!(!self.timeframes.is_empty(), "timeframes list is empty");
        anyhow::ensure!(self.rsi_period > 0, "rsi_period must be positive");
        anyhow::ensure!(self.atr_period > 0, "atr_period must be positive");
        anyhow::ensure!(self.kline_limit > 0, "kline_limit must be positive");
        // Real-world offsets span UTC-12:00 to UTC+14:00.
        anyhow::ensure!(
            (-14 * 60..=14 * 60).contains(&self.utc_offset_minutes),
            "utc_offset_minutes out of range: {}",
            self.utc_offset_minutes
        );
        Ok(())
    }

    /// Timezone the report timestamp is rendered in.
    pub fn report_offset(&self) -> FixedOffset {
        // Validated in `load`, so the fallback only guards hand-built configs.
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"telegram": {"token": "123:abc", "chat_id": "-100200300"}}"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = AppConfig::from_slice(MINIMAL.as_bytes()).unwrap();
        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.symbols.len(), 4);
        assert_eq!(config.timeframes, ["1m", "5m", "15m", "1h", "1d"]);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.atr_period, 14);
        assert_eq!(config.kline_limit, 100);
        assert_eq!(config.poll_interval_secs, 900);
        assert_eq!(config.utc_offset_minutes, 0);
        assert!(!config.server.enabled);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.binance_base_url, "https://api.binance.com");
    }

    #[test]
    fn missing_telegram_section_is_an_error() {
        let result = AppConfig::from_slice(br#"{"symbols": ["BTCUSDT"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_token_is_an_error() {
        let raw = r#"{"telegram": {"token": "", "chat_id": "42"}}"#;
        assert!(AppConfig::from_slice(raw.as_bytes()).is_err());
    }

    #[test]
    fn offset_out_of_range_is_an_error() {
        let raw = r#"{
            "telegram": {"token": "123:abc", "chat_id": "42"},
            "utc_offset_minutes": 1500
        }"#;
        assert!(AppConfig::from_slice(raw.as_bytes()).is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let raw = r#"{
            "telegram": {"token": "123:abc", "chat_id": "42"},
            "symbols": ["ETHUSDT"],
            "timeframes": ["4h"],
            "rsi_period": 21,
            "poll_interval_secs": 60,
            "utc_offset_minutes": 180,
            "server": {"enabled": true, "port": 3000}
        }"#;
        let config = AppConfig::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(config.symbols, ["ETHUSDT"]);
        assert_eq!(config.timeframes, ["4h"]);
        assert_eq!(config.rsi_period, 21);
        assert_eq!(config.atr_period, 14);
        assert!(config.server.enabled);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.report_offset().local_minus_utc(), 180 * 60);
    }
}
