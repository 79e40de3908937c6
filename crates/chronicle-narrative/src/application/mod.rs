//! Application services for the Narrative context.

pub mod command_handlers;
pub mod completion;
pub mod engine;
pub mod instantiator;
pub mod narrator;
pub mod query_handlers;
pub mod rewards;
pub mod spawn_chain;
