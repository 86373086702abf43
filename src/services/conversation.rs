use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::{Message, Session};
use crate::services::booking_flow::{self, Effect, Event, WidgetEvent};
use crate::services::calendar::timezone_label;
use crate::state::AppState;

/// Applies one widget event to a session, performing any upstream call the
/// booking script asks for before returning.
pub async fn process_event(
    state: &Arc<AppState>,
    session: &mut Session,
    event: WidgetEvent,
) -> Result<(), AppError> {
    if let WidgetEvent::Text { content } = &event {
        if content.trim().is_empty() {
            return Ok(());
        }
        session.messages.push(Message::user(content.clone()));
    }

    tracing::info!(
        session = %session.id,
        event = event.name(),
        step = session.wizard.step.as_str(),
        "widget event"
    );

    let mut next = Some(Event::Widget(event));
    while let Some(event) = next.take() {
        let outcome = booking_flow::transition(&session.wizard, &event)?;
        session.wizard = outcome.wizard;
        session.messages.extend(outcome.replies);

        next = match outcome.effect {
            Some(effect) => Some(perform(state, &session.user_id, effect).await),
            None => None,
        };
    }

    session.touch(state.sessions.ttl_minutes());
    Ok(())
}

async fn perform(state: &Arc<AppState>, user_id: &str, effect: Effect) -> Event {
    match effect {
        Effect::Ask { query } => match state.backend.ask(&query, user_id).await {
            Ok(data) => {
                let answer = data
                    .get("answer")
                    .and_then(|a| a.as_str())
                    .map(str::to_string);
                Event::AskAnswered(answer)
            }
            Err(e) => {
                tracing::error!(error = %e, user_id, "ask request failed");
                Event::AskFailed
            }
        },
        Effect::Schedule(booking) => {
            tracing::info!(
                user_id,
                date = %booking.date,
                time = %booking.time,
                guests = booking.guest_emails.len(),
                "submitting booking"
            );
            match state.backend.schedule(&booking).await {
                Ok(receipt) => Event::ScheduleConfirmed {
                    message: receipt.message,
                    location: timezone_label(state.config.business_timezone, Utc::now()),
                },
                Err(e) => {
                    tracing::error!(error = %e, user_id, "booking request failed");
                    Event::ScheduleFailed
                }
            }
        }
    }
}
