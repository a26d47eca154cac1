//! Outbound message content

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// One segment of an outbound message, in OneBot v11 array form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Segment {
    Reply { id: String },
    Text { text: String },
}

/// Message payload built from segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagePayload(Vec<Segment>);

impl MessagePayload {
    /// Reference to the message being answered
    pub fn reply(message_id: impl Into<String>) -> Self {
        Self(vec![Segment::Reply { id: message_id.into() }])
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self(vec![Segment::Text { text: text.into() }])
    }

    /// Reply to `message_id` with `text`
    pub fn reply_with_text(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::reply(message_id) + Self::text(text)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated text segments, for logging and console output
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|s| match s {
                Segment::Text { text } => Some(text.as_str()),
                Segment::Reply { .. } => None,
            })
            .collect()
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.0.iter().find_map(|s| match s {
            Segment::Reply { id } => Some(id.as_str()),
            Segment::Text { .. } => None,
        })
    }
}

impl Add for MessagePayload {
    type Output = MessagePayload;

    fn add(mut self, rhs: MessagePayload) -> Self::Output {
        self.0.extend(rhs.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_then_text_serializes_as_segment_array() {
        let payload = MessagePayload::reply_with_text("123", "hello");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "reply", "data": {"id": "123"}},
                {"type": "text", "data": {"text": "hello"}},
            ])
        );
        assert_eq!(payload.reply_to(), Some("123"));
        assert_eq!(payload.plain_text(), "hello");
    }
}
