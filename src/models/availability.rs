use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Daily window within which bookings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl BusinessHours {
    pub fn to_human_readable(&self) -> String {
        format!(
            "{} às {}",
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}

/// A time range already occupied on the calendar. Invariant: start < end.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub label: String,
}

impl BusyInterval {
    pub fn overlaps(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> bool {
        self.start < end && self.end > start
    }
}

/// Calendar state for one day, read fresh on every orchestration run.
///
/// `Unknown` means the provider could not be reached. It must never be
/// rendered as "free" — the prompt builder substitutes conservative
/// language instead.
#[derive(Debug, Clone)]
pub enum AvailabilityStatus {
    Known(Vec<BusyInterval>),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct AvailabilitySummary {
    pub day: NaiveDate,
    pub hours: BusinessHours,
    pub status: AvailabilityStatus,
}

impl AvailabilitySummary {
    pub fn unknown(day: NaiveDate, hours: BusinessHours) -> Self {
        Self {
            day,
            hours,
            status: AvailabilityStatus::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.status, AvailabilityStatus::Unknown)
    }

    /// True only when availability is known and the range touches no busy
    /// interval. Unknown availability reports `false` for every range.
    pub fn is_free(&self, start: DateTime<Tz>, end: DateTime<Tz>) -> bool {
        match &self.status {
            AvailabilityStatus::Known(busy) => !busy.iter().any(|b| b.overlaps(start, end)),
            AvailabilityStatus::Unknown => false,
        }
    }
}
