use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{BookingDirective, BookingResult};
use crate::services::calendar::{CalendarProvider, NewEvent};

pub const REASON_INVALID_DATETIME: &str = "invalid date/time";
pub const REASON_SLOT_TAKEN: &str = "slot already taken";

/// Validates a directive against the live calendar and inserts the event.
///
/// The conflict check is a fresh, narrow list over exactly the candidate
/// interval — the availability summary read earlier in the run is stale by
/// now. Check-then-insert is not atomic: two near-simultaneous commits for
/// the same slot can race. Accepted limitation; the provider offers no
/// conditional write to close it.
pub async fn commit(
    calendar: &dyn CalendarProvider,
    directive: &BookingDirective,
    tz: Tz,
) -> BookingResult {
    let start = match resolve_start(directive, tz) {
        Ok(start) => start,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting directive");
            return BookingResult::rejected(REASON_INVALID_DATETIME);
        }
    };
    let end = start + Duration::minutes(i64::from(directive.duration_minutes));

    match conflict_check(calendar, start, end).await {
        Ok(None) => {}
        Ok(Some(conflicting)) => {
            tracing::info!(
                client = %directive.client_name,
                conflicting_event = %conflicting,
                error = %AppError::SlotConflict,
                "refusing to double-book"
            );
            return BookingResult::rejected(REASON_SLOT_TAKEN);
        }
        Err(e) => {
            tracing::error!(error = %e, "conflict check failed, refusing to book blind");
            return BookingResult::rejected(format!("calendar check failed: {e}"));
        }
    }

    let event = NewEvent {
        summary: format!("{} — {}", directive.session_type, directive.client_name),
        description: directive
            .phone
            .as_ref()
            .map(|phone| format!("Contato: {phone}")),
        start,
        end,
    };

    // Insert errors surface as failure and are never retried: a retry
    // after an ambiguous provider response could create a duplicate event.
    match calendar.insert_event(&event).await {
        Ok(created) => BookingResult::booked(created.id, created.html_link),
        Err(e) => {
            tracing::error!(error = %e, "calendar insert failed");
            BookingResult::rejected(e.to_string())
        }
    }
}

/// Resolves the directive's wall-clock date+time in the business timezone.
/// Ambiguous local times (DST fold) take the earlier instant; nonexistent
/// local times (DST gap) are invalid.
fn resolve_start(directive: &BookingDirective, tz: Tz) -> Result<DateTime<Tz>, AppError> {
    tz.from_local_datetime(&directive.date.and_time(directive.time))
        .earliest()
        .ok_or_else(|| {
            AppError::InvalidDateTime(format!(
                "{} {} does not exist in {}",
                directive.date, directive.time, tz
            ))
        })
}

/// Returns the label of the first event overlapping the candidate
/// interval, if any.
async fn conflict_check(
    calendar: &dyn CalendarProvider,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
) -> anyhow::Result<Option<String>> {
    let events = calendar.list_events(start, end).await?;
    for event in events {
        let (Some(event_start), Some(event_end)) =
            (event.start.date_time, event.end.date_time)
        else {
            // All-day event inside the candidate window: treat as taken.
            return Ok(Some(event.summary.unwrap_or_else(|| event.id.clone())));
        };
        if event_start < end && event_end > start {
            return Ok(Some(event.summary.unwrap_or_else(|| event.id.clone())));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use chrono_tz::America::Sao_Paulo;

    use super::*;
    use crate::services::calendar::{CalendarEvent, CreatedEvent, EventTime};

    struct ScriptedCalendar {
        events: Vec<CalendarEvent>,
        fail_insert: bool,
        inserted: Mutex<Vec<NewEvent>>,
    }

    impl ScriptedCalendar {
        fn empty() -> Self {
            Self {
                events: vec![],
                fail_insert: false,
                inserted: Mutex::new(vec![]),
            }
        }

        fn with_events(events: Vec<CalendarEvent>) -> Self {
            Self {
                events,
                fail_insert: false,
                inserted: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl CalendarProvider for ScriptedCalendar {
        async fn list_events(
            &self,
            _time_min: DateTime<Tz>,
            _time_max: DateTime<Tz>,
        ) -> anyhow::Result<Vec<CalendarEvent>> {
            Ok(self.events.clone())
        }

        async fn insert_event(&self, event: &NewEvent) -> anyhow::Result<CreatedEvent> {
            if self.fail_insert {
                anyhow::bail!("quota exceeded");
            }
            self.inserted.lock().unwrap().push(event.clone());
            Ok(CreatedEvent {
                id: Some("evt-1".to_string()),
                html_link: Some("https://calendar.example/evt-1".to_string()),
            })
        }
    }

    fn directive(time: &str, duration: u32) -> BookingDirective {
        BookingDirective {
            client_name: "Maria Souza".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            duration_minutes: duration,
            session_type: "Ensaio gestante".to_string(),
            phone: Some("+55 11 98888-0000".to_string()),
        }
    }

    /// 14:00–15:00 São Paulo time is 17:00–18:00 UTC.
    fn busy_event() -> CalendarEvent {
        CalendarEvent {
            id: "busy".to_string(),
            summary: Some("Ensaio newborn".to_string()),
            start: EventTime {
                date_time: Utc.with_ymd_and_hms(2025, 6, 16, 17, 0, 0).single(),
                date: None,
            },
            end: EventTime {
                date_time: Utc.with_ymd_and_hms(2025, 6, 16, 18, 0, 0).single(),
                date: None,
            },
        }
    }

    #[tokio::test]
    async fn test_clear_slot_books_and_returns_link() {
        let calendar = ScriptedCalendar::empty();
        let result = commit(&calendar, &directive("10:00", 60), Sao_Paulo).await;
        assert!(result.success);
        assert_eq!(result.event_id.as_deref(), Some("evt-1"));
        assert!(result.event_link.is_some());

        let inserted = calendar.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].summary, "Ensaio gestante — Maria Souza");
        assert_eq!(
            inserted[0].description.as_deref(),
            Some("Contato: +55 11 98888-0000")
        );
        assert_eq!(inserted[0].end - inserted[0].start, Duration::minutes(60));
    }

    #[tokio::test]
    async fn test_overlap_is_rejected_without_insert() {
        let calendar = ScriptedCalendar::with_events(vec![busy_event()]);
        // 14:30 + 30min overlaps the 14:00–15:00 event.
        let result = commit(&calendar, &directive("14:30", 30), Sao_Paulo).await;
        assert!(!result.success);
        assert_eq!(result.failure_reason.as_deref(), Some(REASON_SLOT_TAKEN));
        assert!(calendar.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjacent_slot_is_allowed() {
        let calendar = ScriptedCalendar::with_events(vec![busy_event()]);
        // Starts exactly when the busy event ends.
        let result = commit(&calendar, &directive("15:00", 60), Sao_Paulo).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_insert_failure_surfaces_reason() {
        let calendar = ScriptedCalendar {
            fail_insert: true,
            ..ScriptedCalendar::empty()
        };
        let result = commit(&calendar, &directive("10:00", 60), Sao_Paulo).await;
        assert!(!result.success);
        assert!(result.failure_reason.unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_nonexistent_local_time_is_invalid() {
        // Brazil abolished DST in 2019; use a date when it still applied.
        // 2018-11-04 00:00 did not exist in São Paulo (clocks jumped to 01:00).
        let d = BookingDirective {
            date: NaiveDate::from_ymd_opt(2018, 11, 4).unwrap(),
            time: NaiveTime::from_hms_opt(0, 30, 0).unwrap(),
            ..directive("10:00", 60)
        };
        let calendar = ScriptedCalendar::empty();
        let result = commit(&calendar, &d, Sao_Paulo).await;
        assert!(!result.success);
        assert_eq!(
            result.failure_reason.as_deref(),
            Some(REASON_INVALID_DATETIME)
        );
        assert!(calendar.inserted.lock().unwrap().is_empty());
    }
}
