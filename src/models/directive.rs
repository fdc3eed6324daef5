use chrono::{NaiveDate, NaiveTime};

/// A fully validated booking request extracted from model output.
///
/// Constructed only by the directive extractor, which rejects any payload
/// with missing or malformed fields — a value of this type is structurally
/// complete, though still unverified against the live calendar. Lives for
/// one orchestration run and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDirective {
    pub client_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub session_type: String,
    pub phone: Option<String>,
}
