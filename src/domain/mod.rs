//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (GroupMessage, MessagePayload, GroupFeatureState)
//! - Traits: Abstractions for infrastructure (Bot, StateStore)
//! - Rules: the title command grammar

pub mod entities;
pub mod traits;
