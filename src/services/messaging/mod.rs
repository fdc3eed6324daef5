pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AppError;

/// Single delivery attempt against the messaging platform. Success means
/// the platform itself acknowledged the message, not merely HTTP 200.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;
}

/// Retry schedule for outbound deliveries, injected once at startup so
/// every call site shares the same policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(700),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: base delay multiplied by the attempt number.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Outbound channel with bounded retry. Exhausted retries are logged as a
/// definitive failure and reported as `false`; nothing is re-raised.
pub struct DeliveryChannel {
    provider: Box<dyn MessagingProvider>,
    retry: RetryPolicy,
}

impl DeliveryChannel {
    pub fn new(provider: Box<dyn MessagingProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub async fn deliver(&self, chat_id: i64, text: &str) -> bool {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.provider.send_message(chat_id, text).await {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!(
                        chat_id,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "delivery attempt failed"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
            }
        }
        let definitive = AppError::DeliveryFailure { attempts };
        tracing::error!(chat_id, error = %definitive, "giving up on delivery");
        false
    }
}
