//! Driving port for event write use-cases.
//!
//! Successful writes report the views they invalidated so inbound adapters
//! can forward the signal to their clients.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, EventId, EventPatch, SessionHandle};

use super::ViewPath;

/// Request to create an event for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub session: SessionHandle,
    pub draft: EventDraft,
}

/// Stored event and the views its creation made stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventResponse {
    pub event: Event,
    pub invalidated: Vec<ViewPath>,
}

/// Request to patch one of the caller's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventRequest {
    pub session: SessionHandle,
    pub event_id: EventId,
    pub patch: EventPatch,
}

/// Updated event and the views the change made stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventResponse {
    pub event: Event,
    pub invalidated: Vec<ViewPath>,
}

/// Request to delete one of the caller's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEventRequest {
    pub session: SessionHandle,
    pub event_id: EventId,
}

/// Views made stale by the deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEventResponse {
    pub invalidated: Vec<ViewPath>,
}

/// Driving port for event writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsCommand: Send + Sync {
    /// Validates and stores a new event.
    async fn create_event(&self, request: CreateEventRequest)
    -> Result<CreateEventResponse, Error>;

    /// Validates and applies a partial update.
    async fn update_event(&self, request: UpdateEventRequest)
    -> Result<UpdateEventResponse, Error>;

    /// Deletes an event; missing rows are not an error.
    async fn delete_event(&self, request: DeleteEventRequest)
    -> Result<DeleteEventResponse, Error>;
}

/// Fixture command that treats every caller as anonymous.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventsCommand;

#[async_trait]
impl EventsCommand for FixtureEventsCommand {
    async fn create_event(
        &self,
        _request: CreateEventRequest,
    ) -> Result<CreateEventResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }

    async fn update_event(
        &self,
        _request: UpdateEventRequest,
    ) -> Result<UpdateEventResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }

    async fn delete_event(
        &self,
        _request: DeleteEventRequest,
    ) -> Result<DeleteEventResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }
}
