pub mod http;

use async_trait::async_trait;

use crate::models::{BookingDraft, ScheduleReceipt};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("API returned {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The question-answering and scheduling service the widget talks to.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Raw JSON reply of the `/ask` endpoint.
    async fn ask(&self, query: &str, user_id: &str) -> Result<serde_json::Value, UpstreamError>;

    async fn schedule(&self, booking: &BookingDraft) -> Result<ScheduleReceipt, UpstreamError>;
}
