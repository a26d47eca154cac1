//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod feature;
pub mod group_message;
pub mod payload;
pub mod sender;

pub use command::{extract_title, SwitchCommand, TITLE_KEYWORD};
pub use feature::GroupFeatureState;
pub use group_message::{GroupMessage, SubType};
pub use payload::{MessagePayload, Segment};
pub use sender::Sender;
