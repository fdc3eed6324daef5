pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Start or end of a provider event. Timed events carry `date_time`;
/// all-day events only carry `date`.
#[derive(Debug, Clone, Default)]
pub struct EventTime {
    pub date_time: Option<DateTime<Utc>>,
    pub date: Option<NaiveDate>,
}

/// A provider event as returned by the list call. Owned by the external
/// calendar; this system never caches it across runs.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

/// Event to be inserted. Times are rendered with an explicit IANA
/// timezone so the provider stores wall-clock intent, not just an instant.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

#[derive(Debug, Clone, Default)]
pub struct CreatedEvent {
    pub id: Option<String>,
    pub html_link: Option<String>,
}

/// Calendar seam: one list call, one insert call. The committer's
/// conflict check and the availability reader both go through `list_events`
/// so tests can script the calendar.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events intersecting `[time_min, time_max]`, recurring events
    /// expanded to single instances, ordered by start time.
    async fn list_events(
        &self,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> anyhow::Result<Vec<CalendarEvent>>;

    async fn insert_event(&self, event: &NewEvent) -> anyhow::Result<CreatedEvent>;
}
