//! GiveMeTitle - a group chat bot that hands out special titles on request.

pub mod domain;
pub mod application;
pub mod infrastructure;
