pub mod gemini;

use async_trait::async_trait;

/// Generative-language seam. One system instruction, one user turn — each
/// orchestration run is a fresh, history-free exchange.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, system_instruction: &str, user_text: &str)
        -> anyhow::Result<String>;
}
