use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Telegram webhook update envelope. Only the fields this bot reads;
/// everything else in the update is ignored.
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

/// One inbound chat message, alive for exactly one orchestration run.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl TelegramUpdate {
    /// Extracts the processable message, if any. Updates without a message
    /// or without text (stickers, edits, joins) are no-ops.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let text = message.text?;
        if text.trim().is_empty() {
            return None;
        }
        Some(InboundMessage {
            chat_id: message.chat.id,
            text,
            received_at: Utc::now(),
        })
    }
}
