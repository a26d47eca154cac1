//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{MessageDispatcher, Route};
pub use parser::EventParser;
