/// Failure taxonomy for one orchestration run.
///
/// Every variant is caught at the component that produced it and turned
/// into either a degraded-but-valid value (unknown availability, "no
/// directive") or a deterministic user-facing message. Nothing here ever
/// crosses the webhook boundary as an HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("calendar unavailable: {0}")]
    CalendarUnavailable(String),

    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("malformed directive payload: {0}")]
    MalformedDirective(String),

    #[error("slot conflict")]
    SlotConflict,

    #[error("delivery failure after {attempts} attempts")]
    DeliveryFailure { attempts: u32 },

    #[error("language model failure: {0}")]
    UpstreamModelFailure(String),
}
