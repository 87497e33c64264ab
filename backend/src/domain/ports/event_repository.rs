//! Port for owner-scoped event persistence.
//!
//! Every operation takes the owner id resolved by the authorisation gate.
//! Rows owned by someone else are indistinguishable from missing rows.

use async_trait::async_trait;

use crate::domain::{Event, EventFilters, EventId, UserId, ValidatedEvent, ValidatedPatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
        /// No row matched both the id and the owner.
        NotFound { id: EventId } => "event {id} not found",
    }
}

/// Port for reading and writing a single owner's events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events matching `filters`, ordered by `date_time` ascending.
    async fn find_all(
        &self,
        owner: &UserId,
        filters: &EventFilters,
    ) -> Result<Vec<Event>, EventRepositoryError>;

    /// Number of events matching `filters`, ignoring pagination.
    async fn count(&self, owner: &UserId, filters: &EventFilters)
    -> Result<u64, EventRepositoryError>;

    /// Fetch one event.
    async fn find_by_id(&self, owner: &UserId, id: &EventId)
    -> Result<Event, EventRepositoryError>;

    /// Store a new event, assigning its id and timestamps.
    async fn insert(
        &self,
        owner: &UserId,
        record: &ValidatedEvent,
    ) -> Result<Event, EventRepositoryError>;

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: &ValidatedPatch,
    ) -> Result<Event, EventRepositoryError>;

    /// Remove an event. Deleting a missing row succeeds.
    async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), EventRepositoryError>;
}

/// Fixture repository that holds no events and refuses writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventRepository;

#[async_trait]
impl EventRepository for FixtureEventRepository {
    async fn find_all(
        &self,
        _owner: &UserId,
        _filters: &EventFilters,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(Vec::new())
    }

    async fn count(
        &self,
        _owner: &UserId,
        _filters: &EventFilters,
    ) -> Result<u64, EventRepositoryError> {
        Ok(0)
    }

    async fn find_by_id(
        &self,
        _owner: &UserId,
        id: &EventId,
    ) -> Result<Event, EventRepositoryError> {
        Err(EventRepositoryError::not_found(*id))
    }

    async fn insert(
        &self,
        _owner: &UserId,
        _record: &ValidatedEvent,
    ) -> Result<Event, EventRepositoryError> {
        Err(EventRepositoryError::query("fixture repository is read-only"))
    }

    async fn update(
        &self,
        _owner: &UserId,
        id: &EventId,
        _patch: &ValidatedPatch,
    ) -> Result<Event, EventRepositoryError> {
        Err(EventRepositoryError::not_found(*id))
    }

    async fn delete(&self, _owner: &UserId, _id: &EventId) -> Result<(), EventRepositoryError> {
        Ok(())
    }
}
