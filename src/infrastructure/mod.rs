//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: JSON file persistence
//! - Database: SQLite persistence
//! - Adapters: Platform integrations (OneBot, console)

pub mod config;
pub mod storage;
pub mod database;
pub mod adapters;
