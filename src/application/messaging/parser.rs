//! Event parser - Parses raw platform events into group messages

use serde_json::Value;

use crate::application::errors::BotError;
use crate::domain::entities::{GroupMessage, Sender, SubType};

/// Parses OneBot v11 events into [`GroupMessage`] values
#[derive(Debug, Clone, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one JSON-encoded event
    pub fn parse_line(&self, line: &str) -> Result<Option<GroupMessage>, BotError> {
        let event: Value = serde_json::from_str(line)
            .map_err(|e| BotError::Parse(format!("Invalid event: {}", e)))?;
        Ok(self.parse_event(&event))
    }

    /// Returns `None` for anything that is not a group message event
    pub fn parse_event(&self, event: &Value) -> Option<GroupMessage> {
        if event.get("post_type").and_then(Value::as_str) != Some("message") {
            return None;
        }
        if event.get("message_type").and_then(Value::as_str) != Some("group") {
            return None;
        }
        Some(self.parse_group_message(event))
    }

    /// Copy the fields of a group message event. Missing fields become empty,
    /// except `sub_type` which defaults to `normal`.
    pub fn parse_group_message(&self, event: &Value) -> GroupMessage {
        let sub_type = match event.get("sub_type") {
            None | Some(Value::Null) => SubType::Normal,
            Some(v) => SubType::parse(&coerce_string(v)),
        };

        let sender = event.get("sender")
            .filter(|s| s.is_object())
            .and_then(|s| serde_json::from_value::<Sender>(s.clone()).ok())
            .unwrap_or_default();

        let content = event.get("message")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        GroupMessage::new(
            field_string(event, "group_id"),
            field_string(event, "user_id"),
            field_string(event, "raw_message"),
        )
        .with_message_id(field_string(event, "message_id"))
        .with_sub_type(sub_type)
        .with_sender(sender)
        .with_content(content)
    }
}

fn field_string(event: &Value, key: &str) -> String {
    event.get(key).map(coerce_string).unwrap_or_default()
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
