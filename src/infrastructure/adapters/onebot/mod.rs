//! OneBot v11 HTTP adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities::MessagePayload;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Standard OneBot action response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse<T> {
    pub status: String,
    pub retcode: i64,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: serde_json::Value,
}

#[derive(Serialize)]
struct SendGroupMsgRequest<'a> {
    group_id: &'a str,
    message: &'a MessagePayload,
}

#[derive(Serialize)]
struct SetGroupSpecialTitleRequest<'a> {
    group_id: &'a str,
    user_id: &'a str,
    special_title: &'a str,
}

/// Adapter calling a OneBot implementation's HTTP API
pub struct OneBotAdapter {
    base_url: String,
    access_token: Option<String>,
    client: Client,
    info: BotInfo,
}

impl OneBotAdapter {
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "give-me-title".to_string(),
                platform: "onebot".to_string(),
            },
        }
    }

    /// Get the API URL for an action
    fn api_url(&self, action: &str) -> String {
        format!("{}/{}", self.base_url, action)
    }

    /// Call an action and unwrap the response envelope
    async fn call<B, T>(&self, action: &str, body: &B) -> Result<Option<T>, BotError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let mut request = self.client.post(self.api_url(action)).json(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Transport(format!("OneBot API error on {}: {}", action, response.status())));
        }

        let data: ActionResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if data.status == "failed" || data.retcode != 0 {
            return Err(BotError::Transport(format!(
                "{} failed with retcode {}: {}",
                action,
                data.retcode,
                data.message.unwrap_or_default()
            )));
        }

        Ok(data.data)
    }
}

#[async_trait]
impl Bot for OneBotAdapter {
    async fn send_group_message(&self, group_id: &str, payload: &MessagePayload) -> Result<String, BotError> {
        let request = SendGroupMsgRequest { group_id, message: payload };
        let sent: Option<SentMessage> = self.call("send_group_msg", &request).await?;
        Ok(sent
            .map(|s| match s.message_id {
                serde_json::Value::String(id) => id,
                other => other.to_string(),
            })
            .unwrap_or_default())
    }

    async fn set_group_special_title(&self, group_id: &str, user_id: &str, title: &str) -> Result<(), BotError> {
        let request = SetGroupSpecialTitleRequest {
            group_id,
            user_id,
            special_title: title,
        };
        let _: Option<serde_json::Value> = self.call("set_group_special_title", &request).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
