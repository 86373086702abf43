use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Body accepted by the relay route.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// `null` and an absent key both read as no messages.
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// Body sent to the upstream `/ask` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AskQuery<'a> {
    pub query: &'a str,
    pub user_id: &'a str,
}
