//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: the group command handler and its per-group toggle locks
//! - Errors: Domain-specific errors
//! - Messaging: Event parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
