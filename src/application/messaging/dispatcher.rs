//! Message dispatcher - Routes group messages to the command handler

use std::sync::Arc;

use serde_json::Value;

use crate::application::errors::BotError;
use crate::application::services::{GroupCommandHandler, HandleOutcome};
use crate::domain::entities::{GroupMessage, SwitchCommand};
use super::parser::EventParser;

/// Which entry point of the handler a message goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Toggle,
    Handle,
}

/// Message dispatcher - parses events and routes them to the handler
pub struct MessageDispatcher {
    parser: EventParser,
    switch: SwitchCommand,
    handler: Arc<GroupCommandHandler>,
}

impl MessageDispatcher {
    pub fn new(switch_command: impl Into<String>, handler: Arc<GroupCommandHandler>) -> Self {
        Self {
            parser: EventParser::new(),
            switch: SwitchCommand::new(switch_command),
            handler,
        }
    }

    pub fn route(&self, message: &GroupMessage) -> Route {
        if message.is_normal() && self.switch.matches(&message.raw_message) {
            Route::Toggle
        } else {
            Route::Handle
        }
    }

    /// Dispatch an already parsed group message
    pub async fn dispatch(&self, message: &GroupMessage) -> HandleOutcome {
        match self.route(message) {
            Route::Toggle => self.handler.toggle_function_status(message).await,
            Route::Handle => self.handler.handle(message).await,
        }
    }

    /// Process a raw event. Returns `None` for non group message events.
    pub async fn process_event(&self, event: &Value) -> Option<HandleOutcome> {
        let message = self.parser.parse_event(event)?;
        Some(self.dispatch(&message).await)
    }

    /// Process one JSON-encoded event
    pub async fn process_line(&self, line: &str) -> Result<Option<HandleOutcome>, BotError> {
        let Some(message) = self.parser.parse_line(line)? else {
            return Ok(None);
        };
        Ok(Some(self.dispatch(&message).await))
    }
}
