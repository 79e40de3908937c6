//! Chronicle event store.
//!
//! Implementations of `chronicle_core::repository::EventRepository`: an
//! in-memory store used by default and in tests, and a PostgreSQL store used
//! when a database is configured.

pub mod in_memory;
pub mod pg_event_repository;
