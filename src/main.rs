use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fotoagenda::config::AppConfig;
use fotoagenda::handlers;
use fotoagenda::services::ai::gemini::GeminiProvider;
use fotoagenda::services::calendar::google::GoogleCalendarProvider;
use fotoagenda::services::messaging::telegram::TelegramChannel;
use fotoagenda::services::messaging::{DeliveryChannel, RetryPolicy};
use fotoagenda::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!(
        model = %config.gemini_model,
        timezone = %config.business_timezone,
        "starting scheduling assistant"
    );

    let llm = GeminiProvider::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let calendar = GoogleCalendarProvider::new(
        config.calendar_id.clone(),
        config.service_account_email.clone(),
        &config.service_account_private_key,
    )?;
    let delivery = DeliveryChannel::new(
        Box::new(TelegramChannel::new(config.bot_token.clone())),
        RetryPolicy::default(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        llm: Box::new(llm),
        calendar: Box::new(calendar),
        delivery,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/telegram", post(handlers::webhook::telegram_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
