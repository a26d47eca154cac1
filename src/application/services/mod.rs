//! Application services - Business logic orchestration

pub mod command_service;
pub mod group_locks;

pub use command_service::{GroupCommandHandler, HandleOutcome, IgnoreReason};
pub use group_locks::GroupLocks;
