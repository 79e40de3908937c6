//! Domain types for the Progression context.

pub mod beats;
pub mod commands;
pub mod events;
pub mod progress;
pub mod rhythm;
pub mod selection;
pub mod tier;
