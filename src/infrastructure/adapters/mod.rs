//! Platform adapters

pub mod console;
pub mod onebot;

pub use console::{ConsoleAdapter, OutboundAction};
pub use onebot::OneBotAdapter;
