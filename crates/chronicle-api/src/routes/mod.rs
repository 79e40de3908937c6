//! HTTP route handlers.

pub mod health;
pub mod scenes;
pub mod stories;
pub mod templates;
