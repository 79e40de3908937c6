//! Chronicle Core — shared domain abstractions.
//!
//! This crate defines the traits and types every bounded context of the
//! progression engine depends on: aggregates, event envelopes, the event
//! repository seam, determinism seams, and the shared error type. It contains
//! no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod ids;
pub mod repository;
