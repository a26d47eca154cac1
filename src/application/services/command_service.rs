use std::collections::HashSet;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::{extract_title, GroupMessage, MessagePayload};
use crate::domain::traits::{Bot, StateStore};
use super::GroupLocks;

/// Reply sent after a group is switched on
pub const ENABLED_REPLY: &str = "✅✅✅GiveMeTitle功能已开启";
/// Reply sent after a group is switched off
pub const DISABLED_REPLY: &str = "🚫🚫🚫GiveMeTitle功能已关闭";

/// Why a message produced no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnsupportedSubType,
    GroupNotAllowed,
    NoCommand,
    Unauthorized,
}

/// What handling a message amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    Ignored(IgnoreReason),
    TitleSet { title: String },
    TitleRejected { title: String },
    Toggled { enabled: bool },
    /// Handling failed; `reported` tells whether the error reached the group
    Failed { reported: bool },
}

/// State for one `handle` call
struct HandlerSession<'a> {
    message: &'a GroupMessage,
    feature_enabled: bool,
}

/// Handles title requests and feature switching for allow-listed groups
pub struct GroupCommandHandler {
    store: Arc<dyn StateStore>,
    bot: Arc<dyn Bot>,
    groups: HashSet<String>,
    max_title_length: Option<usize>,
    locks: GroupLocks,
}

impl GroupCommandHandler {
    pub fn new<I, S>(store: Arc<dyn StateStore>, bot: Arc<dyn Bot>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: HashSet<String> = groups.into_iter().map(Into::into).collect();
        tracing::info!("[GiveMeTitle] Group message handler ready for {} group(s)", groups.len());
        Self {
            store,
            bot,
            groups,
            max_title_length: None,
            locks: GroupLocks::new(),
        }
    }

    /// Reject titles longer than `max` characters. `None` forwards any title.
    pub fn with_max_title_length(mut self, max: Option<usize>) -> Self {
        self.max_title_length = max;
        self
    }

    pub fn is_group_allowed(&self, group_id: &str) -> bool {
        self.groups.contains(group_id)
    }

    /// Handle one group message.
    ///
    /// Failures never escape: they are logged and, when the group is known,
    /// reported back to it as plain text.
    pub async fn handle(&self, message: &GroupMessage) -> HandleOutcome {
        match self.process(message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("[GiveMeTitle] Failed to handle group message: {}", e);
                let reported = self
                    .report(&message.group_id, format!("[GiveMeTitle]处理群聊消息失败，错误信息：{}", e))
                    .await;
                HandleOutcome::Failed { reported }
            }
        }
    }

    /// Flip the feature switch of the message's group.
    ///
    /// Unauthorized senders get no reply at all.
    pub async fn toggle_function_status(&self, message: &GroupMessage) -> HandleOutcome {
        match self.toggle(message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("[GiveMeTitle] Failed to toggle feature status: {}", e);
                let reported = self
                    .report(&message.group_id, format!("切换功能状态失败，错误信息：{}", e))
                    .await;
                HandleOutcome::Failed { reported }
            }
        }
    }

    async fn process(&self, message: &GroupMessage) -> Result<HandleOutcome, BotError> {
        if !message.is_normal() {
            tracing::debug!("[GiveMeTitle] Skipping {} message in {}", message.sub_type.as_str(), message.group_id);
            return Ok(HandleOutcome::Ignored(IgnoreReason::UnsupportedSubType));
        }

        if !self.is_group_allowed(&message.group_id) {
            tracing::debug!("[GiveMeTitle] Group {} not authorized", message.group_id);
            return Ok(HandleOutcome::Ignored(IgnoreReason::GroupNotAllowed));
        }

        // Loaded for every message; title requests do not branch on it yet.
        let session = HandlerSession {
            message,
            feature_enabled: self.store.load_feature_status(&message.group_id).await?,
        };

        match extract_title(&message.raw_message) {
            Some(title) => self.assign_title(&session, title).await,
            None => Ok(HandleOutcome::Ignored(IgnoreReason::NoCommand)),
        }
    }

    async fn assign_title(&self, session: &HandlerSession<'_>, title: &str) -> Result<HandleOutcome, BotError> {
        let msg = session.message;
        tracing::debug!(
            "[GiveMeTitle] Title request from {} ({}) in {}, feature enabled: {}",
            msg.user_id, msg.sender, msg.group_id, session.feature_enabled
        );

        if let Some(max) = self.max_title_length {
            let len = title.chars().count();
            if len > max {
                let reply = MessagePayload::reply_with_text(
                    msg.message_id.as_str(),
                    format!("头衔过长，最多{}个字符", max),
                );
                self.bot.send_group_message(&msg.group_id, &reply).await?;
                return Ok(HandleOutcome::TitleRejected { title: title.to_string() });
            }
        }

        self.bot.set_group_special_title(&msg.group_id, &msg.user_id, title).await?;

        let reply = MessagePayload::reply_with_text(msg.message_id.as_str(), format!("已设置头衔为: {}", title));
        self.bot.send_group_message(&msg.group_id, &reply).await?;

        tracing::info!("[GiveMeTitle] Set title of {} in {} to {:?}", msg.user_id, msg.group_id, title);
        Ok(HandleOutcome::TitleSet { title: title.to_string() })
    }

    async fn toggle(&self, message: &GroupMessage) -> Result<HandleOutcome, BotError> {
        if !self.store.is_authorized(&message.user_id).await {
            tracing::debug!("[GiveMeTitle] Ignoring switch request from {}", message.user_id);
            return Ok(HandleOutcome::Ignored(IgnoreReason::Unauthorized));
        }

        let enabled = {
            let _guard = self.locks.lock(&message.group_id).await?;
            let current = self.store.load_feature_status(&message.group_id).await?;
            let next = !current;
            self.store.save_feature_status(&message.group_id, next).await?;
            next
        };

        tracing::info!("[GiveMeTitle] Feature status of {} switched, enabled: {}", message.group_id, enabled);

        let text = if enabled { ENABLED_REPLY } else { DISABLED_REPLY };
        let reply = MessagePayload::reply_with_text(message.message_id.as_str(), text);
        self.bot.send_group_message(&message.group_id, &reply).await?;

        Ok(HandleOutcome::Toggled { enabled })
    }

    /// Send an error report to `group_id`. Returns whether it was delivered.
    async fn report(&self, group_id: &str, text: String) -> bool {
        if group_id.is_empty() {
            return false;
        }
        match self.bot.send_group_message(group_id, &MessagePayload::text(text)).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("[GiveMeTitle] Failed to report error to {}: {}", group_id, e);
                false
            }
        }
    }
}
