use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::MessagingProvider;

const CALL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl MessagingProvider for TelegramChannel {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let resp = self
            .client
            .post(&url)
            .timeout(CALL_TIMEOUT)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .context("failed to call Telegram sendMessage")?;

        let status = resp.status();
        let body: SendMessageResponse = resp
            .json()
            .await
            .context("failed to parse Telegram response")?;

        // Telegram's own ok flag decides success, not the HTTP status.
        if !body.ok {
            anyhow::bail!(
                "Telegram rejected message ({}): {}",
                status,
                body.description.unwrap_or_else(|| "no description".into())
            );
        }

        Ok(())
    }
}
