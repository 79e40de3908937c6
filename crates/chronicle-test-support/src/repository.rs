//! Test repositories — mock `EventRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chronicle_core::error::DomainError;
use chronicle_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// An event repository seeded with history that records every append.
///
/// `load_events` returns the seeded events for the requested aggregate
/// followed by anything appended to it since, so a command handler sees its
/// own writes. Appends never check versions.
#[derive(Debug, Default)]
pub struct RecordingEventRepository {
    seeded: Vec<StoredEvent>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// Create a repository that starts out holding `seeded`.
    #[must_use]
    pub fn new(seeded: Vec<StoredEvent>) -> Self {
        Self {
            seeded,
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every `(aggregate_id, expected_version, events)`
    /// append call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }

    /// Event types appended to `aggregate_id`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_types(&self, aggregate_id: Uuid) -> Vec<String> {
        self.appended
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| *id == aggregate_id)
            .flat_map(|(_, _, events)| events.iter().map(|e| e.event_type.clone()))
            .collect()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let appended = self.appended.lock().unwrap();
        Ok(self
            .seeded
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .chain(
                appended
                    .iter()
                    .filter(|(id, _, _)| *id == aggregate_id)
                    .flat_map(|(_, _, events)| events.iter().cloned()),
            )
            .collect())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// An event repository that always returns an empty event list and silently
/// accepts appends. Useful for testing "aggregate not found" scenarios and
/// creation commands.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// An event repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
