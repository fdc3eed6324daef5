use std::sync::Arc;

use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{
    AvailabilityStatus, AvailabilitySummary, BookingDirective, BookingResult, InboundMessage,
};
use crate::services::availability;
use crate::services::calendar::CalendarProvider;
use crate::services::committer::{self, REASON_INVALID_DATETIME, REASON_SLOT_TAKEN};
use crate::services::directive::{self, DIRECTIVE_MARKER};
use crate::state::AppState;

const APOLOGY_MODEL_DOWN: &str = "Desculpe, estou com uma instabilidade técnica no momento. \
     Pode me mandar sua mensagem de novo em alguns instantes?";

/// Drives one full orchestration run: availability → grounded prompt →
/// model turn → directive extraction → conditional commit → delivery.
///
/// Never raises to the webhook: every failure becomes a user-visible
/// deterministic message plus a log entry.
pub async fn handle_message(state: &Arc<AppState>, inbound: InboundMessage) {
    let tz = state.config.business_timezone;
    let today = inbound.received_at.with_timezone(&tz).date_naive();

    tracing::info!(chat_id = inbound.chat_id, text = %inbound.text, "processing message");

    let summary = availability::get_availability(
        state.calendar.as_ref(),
        today,
        state.config.business_hours,
        tz,
    )
    .await;

    let grounding = build_grounding(&summary);

    let reply = match state.llm.generate(&grounding, &inbound.text).await {
        Ok(text) if !text.trim().is_empty() => {
            compose_reply(state.calendar.as_ref(), tz, &text).await
        }
        Ok(_) => {
            let err = AppError::UpstreamModelFailure("empty generation".to_string());
            tracing::error!(chat_id = inbound.chat_id, error = %err, "model returned nothing");
            APOLOGY_MODEL_DOWN.to_string()
        }
        Err(e) => {
            let err = AppError::UpstreamModelFailure(e.to_string());
            tracing::error!(chat_id = inbound.chat_id, error = %err, "model call failed");
            APOLOGY_MODEL_DOWN.to_string()
        }
    };

    if !state.delivery.deliver(inbound.chat_id, &reply).await {
        tracing::error!(chat_id = inbound.chat_id, "reply was not delivered");
    }
}

/// Turns the model's raw output into the final user-facing text,
/// committing the booking when a valid directive is present.
///
/// The marker and everything after it is directive payload and is never
/// shown to the user. Once a commit is attempted, the model's own phrasing
/// is discarded in favor of a deterministic confirmation or apology, so the
/// chat never shows text describing an appointment that was not durably
/// created.
async fn compose_reply(calendar: &dyn CalendarProvider, tz: Tz, model_text: &str) -> String {
    match directive::extract(model_text) {
        Some(directive) => {
            let result = committer::commit(calendar, &directive, tz).await;
            if result.success {
                confirmation_message(&directive, &result)
            } else {
                failure_message(&result)
            }
        }
        None => {
            let (prose, _) = directive::split_at_marker(model_text);
            let prose = prose.trim();
            if prose.is_empty() {
                // Marker with an unusable payload and no prose around it.
                APOLOGY_MODEL_DOWN.to_string()
            } else {
                prose.to_string()
            }
        }
    }
}

fn confirmation_message(directive: &BookingDirective, result: &BookingResult) -> String {
    let mut message = format!(
        "Agendamento confirmado! ✅\n\n\
         {} para {}\n\
         📅 {} às {} ({} min)",
        directive.session_type,
        directive.client_name,
        directive.date.format("%d/%m/%Y"),
        directive.time.format("%H:%M"),
        directive.duration_minutes,
    );
    if let Some(link) = &result.event_link {
        message.push_str(&format!("\n\nDetalhes: {link}"));
    }
    message
}

fn failure_message(result: &BookingResult) -> String {
    match result.failure_reason.as_deref() {
        Some(REASON_SLOT_TAKEN) => "Poxa, esse horário acabou de ser reservado por outra \
             pessoa. 😔 Pode me dizer outro horário que funcione para você?"
            .to_string(),
        Some(REASON_INVALID_DATETIME) => "Não consegui entender a data e o horário do \
             agendamento. Pode me confirmar o dia e a hora de novo?"
            .to_string(),
        _ => "Não consegui concluir o agendamento agora. 😔 Nada foi reservado — pode \
             tentar de novo em alguns minutos?"
            .to_string(),
    }
}

/// Factual context injected as the model's system instruction so it cannot
/// invent availability.
pub fn build_grounding(summary: &AvailabilitySummary) -> String {
    let mut prompt = format!(
        "Você é a assistente virtual de agendamentos de um estúdio fotográfico. \
         Atenda os clientes em português, de forma simpática e objetiva.\n\n\
         Hoje é {}. O horário de atendimento é das {}.\n\n",
        summary.day.format("%d/%m/%Y"),
        summary.hours.to_human_readable(),
    );

    match &summary.status {
        AvailabilityStatus::Known(busy) if busy.is_empty() => {
            prompt.push_str(
                "AGENDA DE HOJE: totalmente livre dentro do horário de atendimento.\n",
            );
        }
        AvailabilityStatus::Known(busy) => {
            prompt.push_str("AGENDA DE HOJE — horários JÁ OCUPADOS (nunca os ofereça):\n");
            for interval in busy {
                prompt.push_str(&format!(
                    "- {} às {} — {}\n",
                    interval.start.format("%H:%M"),
                    interval.end.format("%H:%M"),
                    interval.label,
                ));
            }
            prompt.push_str(
                "Qualquer horário fora desses intervalos e dentro do horário de \
                 atendimento está disponível.\n",
            );
        }
        AvailabilityStatus::Unknown => {
            prompt.push_str(
                "ATENÇÃO: não foi possível consultar a agenda agora. NÃO confirme nem \
                 garanta nenhum horário. Diga ao cliente que não consegue confirmar a \
                 disponibilidade neste momento e que voltará a confirmar em breve.\n",
            );
        }
    }

    prompt.push_str(&format!(
        "\nRegras:\n\
         1. Nunca afirme que um horário está livre sem base na agenda acima.\n\
         2. Para agendar você precisa de: nome completo do cliente, data, horário, tipo \
         de sessão e, se possível, telefone. A duração padrão é 60 minutos.\n\
         3. Só confirme um agendamento depois que o cliente informar todos os dados e \
         disser explicitamente que confirma.\n\
         4. Quando (e somente quando) o cliente confirmar, termine sua resposta com a \
         linha literal `{DIRECTIVE_MARKER}` seguida de um JSON com os campos: \
         \"nome\", \"data\" (AAAA-MM-DD), \"hora\" (HH:MM), \"duracao_min\", \
         \"tipo_sessao\", \"telefone\". Nada depois do JSON.\n\
         5. Nunca invente confirmação sem o cliente ter informado data, horário e nome \
         completo.\n",
    ));

    prompt
}
