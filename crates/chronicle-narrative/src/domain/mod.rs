//! Domain types for the Narrative context.

pub mod commands;
pub mod events;
pub mod manifest;
pub mod materialize;
pub mod record;
pub mod scene;
pub mod situation;
