use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{AssistantBackend, UpstreamError};
use crate::models::{AskQuery, BookingDraft, ScheduleReceipt};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "calling external API");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(url = %url, status = %status, body = %text, "external API error response");
            return Err(UpstreamError::Status(status));
        }

        resp.json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn ask(&self, query: &str, user_id: &str) -> Result<serde_json::Value, UpstreamError> {
        self.post_json("/ask", &AskQuery { query, user_id }).await
    }

    async fn schedule(&self, booking: &BookingDraft) -> Result<ScheduleReceipt, UpstreamError> {
        self.post_json("/google-calendar/schedule", booking).await
    }
}
