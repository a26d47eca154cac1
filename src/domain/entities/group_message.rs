use super::Sender;

/// Sub type of a group message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubType {
    #[default]
    Normal,
    Anonymous,
    Notice,
    Other(String),
}

impl SubType {
    pub fn as_str(&self) -> &str {
        match self {
            SubType::Normal => "normal",
            SubType::Anonymous => "anonymous",
            SubType::Notice => "notice",
            SubType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "normal" => SubType::Normal,
            "anonymous" => SubType::Anonymous,
            "notice" => SubType::Notice,
            other => SubType::Other(other.to_string()),
        }
    }
}

/// An inbound group message, copied out of the transport event.
///
/// Handlers only ever borrow this value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMessage {
    pub group_id: String,
    pub user_id: String,
    pub message_id: String,
    pub raw_message: String,
    pub sub_type: SubType,
    pub sender: Sender,
    pub message: serde_json::Value,
}

impl GroupMessage {
    pub fn new(group_id: impl Into<String>, user_id: impl Into<String>, raw_message: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            user_id: user_id.into(),
            message_id: String::new(),
            raw_message: raw_message.into(),
            sub_type: SubType::Normal,
            sender: Sender::default(),
            message: serde_json::Value::Array(Vec::new()),
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = id.into();
        self
    }

    pub fn with_sub_type(mut self, sub_type: SubType) -> Self {
        self.sub_type = sub_type;
        self
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_content(mut self, message: serde_json::Value) -> Self {
        self.message = message;
        self
    }

    pub fn is_normal(&self) -> bool {
        self.sub_type == SubType::Normal
    }
}
