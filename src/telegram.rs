use crate::config::TelegramConfig;
use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

const TELEGRAM_API: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            token: config.token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    /// Delivers one report. The caller decides what to do with a failure;
    /// the polling loop logs it and moves on.
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = send_message_url(TELEGRAM_API, &self.token);
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "Markdown"),
        ];

        self.client
            .post(&url)
            .form(&params)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

fn send_message_url(base: &str, token: &str) -> String {
    format!("{}/bot{}/sendMessage", base, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_bot_api_url() {
        assert_eq!(
            send_message_url("https://api.telegram.org", "123:abc"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
