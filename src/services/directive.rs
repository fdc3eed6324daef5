use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::BookingDirective;

/// Literal token the model is instructed to emit immediately before a
/// structured booking payload. Everything after it is machine-read, never
/// shown to the user.
pub const DIRECTIVE_MARKER: &str = "CONFIRMAR AGENDAMENTO:";

const DEFAULT_SESSION_TYPE: &str = "Ensaio fotográfico";

/// Splits model output at the marker: conversational prose before it,
/// directive payload after it (if any).
pub fn split_at_marker(model_text: &str) -> (&str, Option<&str>) {
    match model_text.find(DIRECTIVE_MARKER) {
        Some(pos) => (
            &model_text[..pos],
            Some(&model_text[pos + DIRECTIVE_MARKER.len()..]),
        ),
        None => (model_text, None),
    }
}

/// Scans model output for an embedded booking directive.
///
/// Absence of the marker is the normal "still gathering information"
/// state, not an error. A present marker with a payload that is missing
/// any required field, carries an unparseable date or time, or has a
/// non-positive duration yields `None` as well — partial directives must
/// never reach the committer.
pub fn extract(model_text: &str) -> Option<BookingDirective> {
    let (_, payload) = split_at_marker(model_text);
    let payload = payload?;

    match parse_payload(payload) {
        Ok(directive) => Some(directive),
        Err(e) => {
            let err = AppError::MalformedDirective(e.to_string());
            tracing::warn!(error = %err, raw_payload = payload, "dropping directive");
            None
        }
    }
}

/// JSON shape the grounding prompt tells the model to produce.
#[derive(Debug, Deserialize)]
struct RawDirective {
    nome: Option<String>,
    data: Option<String>,
    hora: Option<String>,
    duracao_min: Option<i64>,
    tipo_sessao: Option<String>,
    telefone: Option<String>,
}

fn parse_payload(payload: &str) -> anyhow::Result<BookingDirective> {
    let json = isolate_json(payload)
        .ok_or_else(|| anyhow::anyhow!("no JSON object after marker"))?;
    let raw: RawDirective = serde_json::from_str(json)?;

    let client_name = raw
        .nome
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing field: nome"))?
        .to_string();

    let date_str = raw
        .data
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("missing field: data"))?;
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("unparseable data: {date_str:?}"))?;

    let time_str = raw
        .hora
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("missing field: hora"))?;
    let time = parse_time(time_str.trim())
        .ok_or_else(|| anyhow::anyhow!("unparseable hora: {time_str:?}"))?;

    let duration = raw
        .duracao_min
        .ok_or_else(|| anyhow::anyhow!("missing field: duracao_min"))?;
    let duration_minutes =
        u32::try_from(duration).ok().filter(|d| *d > 0).ok_or_else(|| {
            anyhow::anyhow!("duracao_min must be positive, got {duration}")
        })?;

    Ok(BookingDirective {
        client_name,
        date,
        time,
        duration_minutes,
        session_type: raw
            .tipo_sessao
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
        phone: raw
            .telefone
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Isolates the JSON object from the payload, stripping markdown fences
/// the model tends to wrap around it.
fn isolate_json(payload: &str) -> Option<&str> {
    let start = payload.find('{')?;
    let end = payload.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&payload[start..=end])
}
