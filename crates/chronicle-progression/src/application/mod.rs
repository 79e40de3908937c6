//! Application services for the Progression context.

pub mod command_handlers;
pub mod generator;
pub mod query_handlers;
