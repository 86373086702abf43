use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::SessionView;
use crate::services::booking_flow::WidgetEvent;
use crate::services::conversation;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewSession {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

// POST /api/widget/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<NewSession>>,
) -> Response {
    let user_id = payload
        .and_then(|Json(p)| p.user_id)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let session = state.sessions.create(user_id);
    tracing::info!(session = %session.id, user_id = %session.user_id, "widget session opened");

    (StatusCode::CREATED, Json(session.view())).into_response()
}

// GET /api/widget/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.snapshot(id)?))
}

// POST /api/widget/sessions/:id/events
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<WidgetEvent>, JsonRejection>,
) -> Result<Json<SessionView>, AppError> {
    let Json(event) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut session = state.sessions.lock(id).await?;
    if let Err(e) = conversation::process_event(&state, &mut session, event).await {
        tracing::warn!(session = %id, error = %e, "widget event refused");
        return Err(e);
    }
    Ok(Json(session.view()))
}

// DELETE /api/widget/sessions/:id
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        tracing::info!(session = %id, "widget session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id.to_string()))
    }
}
