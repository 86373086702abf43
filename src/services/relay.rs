use serde_json::Value;

use crate::errors::AppError;
use crate::models::ChatRequest;
use crate::services::upstream::AssistantBackend;

/// Reply fields checked in order on the upstream payload.
pub const REPLY_FIELDS: [&str; 5] = ["answer", "response", "message", "reply", "text"];

pub const ANONYMOUS_USER: &str = "anonymous_user";

/// Forwards the last message of a chat payload to the ask endpoint and
/// returns the reply text.
pub async fn relay_chat(
    backend: &dyn AssistantBackend,
    request: &ChatRequest,
) -> Result<String, AppError> {
    let messages = request.messages.as_deref().unwrap_or_default();
    let last = messages
        .last()
        .ok_or_else(|| AppError::BadRequest("No messages provided".to_string()))?;

    let user_id = request
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .unwrap_or(ANONYMOUS_USER);

    tracing::info!(user_id, messages = messages.len(), "relaying chat message");

    let data = backend.ask(&last.content, user_id).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "ask endpoint failed");
        AppError::Upstream(e.to_string())
    })?;

    let reply = pick_reply(&data);
    tracing::debug!(reply = %reply, "relay reply");
    Ok(reply)
}

/// First non-empty value among [`REPLY_FIELDS`], else the whole payload.
pub fn pick_reply(data: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| data.get(field))
        .find_map(present_text)
        .unwrap_or_else(|| data.to_string())
}

fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
