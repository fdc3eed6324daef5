/// Outcome of one commit attempt, consumed only by the orchestrator to
/// compose the final reply.
#[derive(Debug, Clone)]
pub struct BookingResult {
    pub success: bool,
    pub event_id: Option<String>,
    pub event_link: Option<String>,
    pub failure_reason: Option<String>,
}

impl BookingResult {
    pub fn booked(event_id: Option<String>, event_link: Option<String>) -> Self {
        Self {
            success: true,
            event_id,
            event_link,
            failure_reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            event_id: None,
            event_link: None,
            failure_reason: Some(reason.into()),
        }
    }
}
