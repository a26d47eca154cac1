use async_trait::async_trait;
use crate::domain::entities::MessagePayload;
use crate::application::errors::BotError;

/// Bot trait - abstraction for the chat platform session
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a message to a group, returning the platform message id
    async fn send_group_message(&self, group_id: &str, payload: &MessagePayload) -> Result<String, BotError>;

    /// Set a member's special title in a group
    async fn set_group_special_title(&self, group_id: &str, user_id: &str, title: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub platform: String,
}
