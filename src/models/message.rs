use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    #[default]
    Text,
    MeetingCard,
    Calendar,
}

/// Summary card rendered after a meeting is booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeetingCard {
    pub summary: String,
    pub duration: String,
    pub datetime: String,
    pub guests: String,
    pub location: String,
}

/// One entry in a widget transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meeting_data: Option<MeetingCard>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            kind: MessageKind::Text,
            meeting_data: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            kind: MessageKind::Text,
            meeting_data: None,
        }
    }

    pub fn calendar() -> Self {
        Self {
            kind: MessageKind::Calendar,
            ..Self::assistant("")
        }
    }

    pub fn meeting_card(card: MeetingCard) -> Self {
        Self {
            kind: MessageKind::MeetingCard,
            meeting_data: Some(card),
            ..Self::assistant("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_card_wire_shape() {
        let msg = Message::meeting_card(MeetingCard {
            summary: "Call".to_string(),
            duration: "30 min".to_string(),
            datetime: "4:00 pm - 4:30 pm, Saturday, June 1, 2024".to_string(),
            guests: "0 Guests".to_string(),
            location: "Asia/Dhaka (1:34pm)".to_string(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["type"], "meeting-card");
        assert_eq!(json["meetingData"]["duration"], "30 min");
    }

    #[test]
    fn test_plain_text_omits_meeting_data() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["type"], "text");
        assert!(json.get("meetingData").is_none());
    }
}
