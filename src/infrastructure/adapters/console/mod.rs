//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::sync::mpsc;
use crate::domain::entities::MessagePayload;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Action the bot performed against the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    GroupMessage { group_id: String, payload: MessagePayload },
    SpecialTitle { group_id: String, user_id: String, title: String },
}

/// Console bot adapter: prints outbound actions instead of calling a platform
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: Option<mpsc::Sender<OutboundAction>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "give-me-title".to_string(),
                platform: "console".to_string(),
            },
            sender: None,
        }
    }

    /// Also forward every action to `sender`
    pub fn with_sender(mut self, sender: mpsc::Sender<OutboundAction>) -> Self {
        self.sender = Some(sender);
        self
    }

    async fn forward(&self, action: OutboundAction) -> Result<(), BotError> {
        if let Some(sender) = &self.sender {
            sender.send(action).await
                .map_err(|e| BotError::Transport(format!("Console channel closed: {}", e)))?;
        }
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_group_message(&self, group_id: &str, payload: &MessagePayload) -> Result<String, BotError> {
        match payload.reply_to() {
            Some(id) => println!("[BOT] [{}] (reply to {}) {}", group_id, id, payload.plain_text()),
            None => println!("[BOT] [{}] {}", group_id, payload.plain_text()),
        }
        self.forward(OutboundAction::GroupMessage {
            group_id: group_id.to_string(),
            payload: payload.clone(),
        })
        .await?;
        Ok(uuid::Uuid::new_v4().to_string())
    }

    async fn set_group_special_title(&self, group_id: &str, user_id: &str, title: &str) -> Result<(), BotError> {
        println!("[BOT] [{}] special title of {} -> {:?}", group_id, user_id, title);
        self.forward(OutboundAction::SpecialTitle {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
        })
        .await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
