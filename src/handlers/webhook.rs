use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::models::TelegramUpdate;
use crate::services::orchestrator;
use crate::state::AppState;

/// Inbound Telegram webhook. Acknowledges immediately and runs the
/// orchestration as a detached task — Telegram applies short delivery
/// timeouts, so the ack must never wait on model or calendar calls.
///
/// The body is decoded leniently: Telegram redelivers non-2xx updates
/// indefinitely, so anything undecodable is acknowledged as a no-op
/// rather than rejected.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    // Shared-secret check (skip if unset — dev mode).
    if !state.config.webhook_secret.is_empty() {
        let provided = headers
            .get("x-telegram-bot-api-secret-token")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != state.config.webhook_secret {
            tracing::warn!("webhook secret mismatch, rejecting update");
            return StatusCode::FORBIDDEN;
        }
    }

    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable update body, acking as no-op");
            return StatusCode::OK;
        }
    };

    // Updates without a text message (stickers, edits, joins) are
    // acknowledged and dropped.
    let Some(inbound) = update.into_inbound() else {
        return StatusCode::OK;
    };

    let state = Arc::clone(&state);
    tokio::spawn(async move {
        orchestrator::handle_message(&state, inbound).await;
    });

    StatusCode::OK
}
