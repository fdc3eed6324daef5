use std::env;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::models::BusinessHours;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub bot_token: String,
    /// Shared secret echoed back by Telegram in the
    /// `X-Telegram-Bot-Api-Secret-Token` header. Empty = no check (dev mode).
    pub webhook_secret: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub calendar_id: String,
    pub service_account_email: String,
    pub service_account_private_key: String,
    pub business_timezone: Tz,
    pub business_hours: BusinessHours,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            bot_token: required("BOT_TOKEN")?,
            webhook_secret: env::var("WEBHOOK_SECRET").unwrap_or_default(),
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            calendar_id: required("CALENDAR_ID")?,
            service_account_email: required("GOOGLE_SA_EMAIL")?,
            // Keys pasted into env files usually carry literal \n escapes.
            service_account_private_key: required("GOOGLE_SA_PRIVATE_KEY")?
                .replace("\\n", "\n"),
            business_timezone: env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| "America/Sao_Paulo".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid BUSINESS_TIMEZONE: {e}"))?,
            business_hours: BusinessHours {
                open: parse_time_var("BUSINESS_HOURS_OPEN", "08:00")?,
                close: parse_time_var("BUSINESS_HOURS_CLOSE", "18:00")?,
            },
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    let value = env::var(name).unwrap_or_default();
    anyhow::ensure!(!value.trim().is_empty(), "{name} must be set");
    Ok(value)
}

fn parse_time_var(name: &str, default: &str) -> anyhow::Result<NaiveTime> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .map_err(|_| anyhow::anyhow!("{name} must be HH:MM, got {raw:?}"))
}
