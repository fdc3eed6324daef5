use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::calendar::CalendarProvider;
use crate::services::messaging::DeliveryChannel;

/// Immutable wiring for the whole process, built once in `main` and shared
/// behind an `Arc`. Orchestration runs hold no state of their own.
pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub calendar: Box<dyn CalendarProvider>,
    pub delivery: DeliveryChannel,
}
