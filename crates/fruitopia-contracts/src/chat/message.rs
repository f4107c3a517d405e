use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    QuickActions,
    FruitCard,
}

/// Persisted with the `type`/`data` field names so older history blobs load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitCard {
    pub name: String,
    pub reason: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatMessage {
    pub fn new(
        text: impl Into<String>,
        sender: Sender,
        kind: MessageKind,
        payload: Option<Value>,
    ) -> Self {
        Self {
            id: format!("msg_{}", Uuid::new_v4().simple()),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            kind,
            payload,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, MessageKind::Text, None)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot, MessageKind::Text, None)
    }

    pub fn fruit_card(text: impl Into<String>, card: &FruitCard) -> Self {
        Self::new(
            text,
            Sender::Bot,
            MessageKind::FruitCard,
            serde_json::to_value(card).ok(),
        )
    }

    pub fn card(&self) -> Option<FruitCard> {
        if self.kind != MessageKind::FruitCard {
            return None;
        }
        serde_json::from_value(self.payload.clone()?).ok()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{ChatMessage, FruitCard, MessageKind, Sender};

    #[test]
    fn message_serializes_with_legacy_field_names() -> anyhow::Result<()> {
        let message = ChatMessage::user("hello");
        let value = serde_json::to_value(&message)?;
        assert_eq!(value["sender"], json!("user"));
        assert_eq!(value["type"], json!("text"));
        assert!(value.get("data").is_none());
        assert!(value["id"].as_str().unwrap_or("").starts_with("msg_"));
        Ok(())
    }

    #[test]
    fn legacy_blob_entry_without_type_decodes_as_text() -> anyhow::Result<()> {
        let raw = json!({
            "id": "msg_1_1700000000000",
            "text": "Which fruits boost immunity?",
            "sender": "user",
            "timestamp": "2024-03-01T10:15:00.000Z"
        });
        let message: ChatMessage = serde_json::from_value(raw)?;
        assert_eq!(message.kind, MessageKind::Text);
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.payload, None);
        Ok(())
    }

    #[test]
    fn message_ids_are_unique() {
        let a = ChatMessage::bot("a");
        let b = ChatMessage::bot("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn fruit_card_payload_roundtrips_through_message() {
        let card = FruitCard {
            name: "Blueberry".to_string(),
            reason: "Rich in antioxidants".to_string(),
            score: 0.92,
            image: None,
        };
        let message = ChatMessage::fruit_card("Try this", &card);
        assert_eq!(message.kind, MessageKind::FruitCard);
        assert_eq!(message.card(), Some(card));
        assert_eq!(ChatMessage::bot("plain").card(), None);
        assert!(matches!(message.payload, Some(Value::Object(_))));
    }
}
