use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{AvailabilityStatus, AvailabilitySummary, BusinessHours, BusyInterval};
use crate::services::calendar::{CalendarEvent, CalendarProvider};

/// Reads one day of calendar state and normalizes it into busy intervals.
///
/// A provider failure degrades to `Unknown`, never to an empty (= fully
/// free) summary: a prompt grounded on a false "agenda is free" would make
/// the model confirm slots that may be taken.
pub async fn get_availability(
    calendar: &dyn CalendarProvider,
    day: NaiveDate,
    hours: BusinessHours,
    tz: Tz,
) -> AvailabilitySummary {
    let Some((window_start, window_end)) = day_window(day, tz) else {
        tracing::error!(%day, "could not resolve day window in business timezone");
        return AvailabilitySummary::unknown(day, hours);
    };

    match calendar.list_events(window_start, window_end).await {
        Ok(events) => {
            let mut busy: Vec<BusyInterval> = events
                .iter()
                .filter_map(|e| to_busy_interval(e, day, tz))
                .collect();
            busy.sort_by_key(|b| b.start);
            AvailabilitySummary {
                day,
                hours,
                status: AvailabilityStatus::Known(busy),
            }
        }
        Err(e) => {
            let err = AppError::CalendarUnavailable(e.to_string());
            tracing::error!(%day, error = %err, "availability read failed, degrading to unknown");
            AvailabilitySummary::unknown(day, hours)
        }
    }
}

/// Inclusive day window [00:00:00.000, 23:59:59.999] in the business timezone.
pub fn day_window(day: NaiveDate, tz: Tz) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let start = tz
        .from_local_datetime(&day.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = tz
        .from_local_datetime(&day.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()?;
    Some((start, end))
}

fn to_busy_interval(event: &CalendarEvent, day: NaiveDate, tz: Tz) -> Option<BusyInterval> {
    let label = event
        .summary
        .clone()
        .unwrap_or_else(|| "Compromisso".to_string());

    // Timed events carry explicit instants; anything else falls back to
    // the all-day date fields. An event the provider returned for this
    // window that cannot be pinned to instants blocks the whole day unless
    // its date range provably excludes it — all-day end dates are
    // exclusive, and a multi-day block covers every day it spans.
    let (start, end) = match (event.start.date_time, event.end.date_time) {
        (Some(s), Some(e)) => (s.with_timezone(&tz), e.with_timezone(&tz)),
        _ => {
            let covers_day = match (event.start.date, event.end.date) {
                (Some(start_date), Some(end_date)) => start_date <= day && end_date > day,
                (Some(start_date), None) => start_date <= day,
                _ => true,
            };
            if !covers_day {
                return None;
            }
            let (start, end) = day_window(day, tz)?;
            (start, end)
        }
    };

    if start >= end {
        tracing::warn!(event_id = %event.id, "skipping event with inverted interval");
        return None;
    }
    Some(BusyInterval { start, end, label })
}
