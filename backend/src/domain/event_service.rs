//! Event use-case services.
//!
//! Each operation runs the same fixed pipeline: resolve the caller through
//! the authorisation gate, validate writes, make one owner-scoped repository
//! call, then signal invalidated views after successful writes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::authorization::AuthorizationGate;
use crate::domain::ports::{
    CountEventsRequest, CountEventsResponse, CreateEventRequest, CreateEventResponse,
    DeleteEventRequest, DeleteEventResponse, EventRepository, EventRepositoryError, EventsCommand,
    EventsQuery, GetEventRequest, GetEventResponse, IdentityProvider, ListEventsRequest,
    ListEventsResponse, UpdateEventRequest, UpdateEventResponse, ViewInvalidator, ViewPath,
};
use crate::domain::{Error, EventFilters, EventValidationError, EventValidator, SportRegistry};

/// Default per-owner event quota.
pub const DEFAULT_MAX_EVENTS_PER_USER: u64 = 100;

fn map_repository_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::NotFound { id } => {
            Error::not_found(format!("Event with id '{id}' not found"))
        }
        EventRepositoryError::Connection { message } => {
            Error::repository(format!("event store unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::repository(format!("event store error: {message}"))
        }
    }
}

/// Event service implementing the read driving port.
pub struct EventQueryService<P, R> {
    gate: AuthorizationGate<P>,
    events: Arc<R>,
    sports: Arc<SportRegistry>,
}

impl<P, R> EventQueryService<P, R>
where
    P: IdentityProvider,
{
    /// Create a query service over the identity provider and repository.
    pub fn new(provider: Arc<P>, events: Arc<R>, sports: Arc<SportRegistry>) -> Self {
        Self {
            gate: AuthorizationGate::new(provider),
            events,
            sports,
        }
    }

    /// Normalise filters and map the sport filter to its canonical id.
    ///
    /// Unknown sports are kept (lower-cased) so they match nothing rather
    /// than silently widening the listing.
    fn scoped_filters(&self, filters: EventFilters) -> EventFilters {
        let mut filters = filters.normalised();
        filters.sport_type = filters.sport_type.map(|sport| {
            self.sports
                .canonical_id(&sport)
                .map_or_else(|| sport.to_lowercase(), str::to_owned)
        });
        filters
    }
}

#[async_trait]
impl<P, R> EventsQuery for EventQueryService<P, R>
where
    P: IdentityProvider,
    R: EventRepository,
{
    async fn list_events(&self, request: ListEventsRequest) -> Result<ListEventsResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        let filters = self.scoped_filters(request.filters);
        let events = self
            .events
            .find_all(&identity.id, &filters)
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %identity.id, count = events.len(), "listed events");
        Ok(ListEventsResponse { events })
    }

    async fn get_event(&self, request: GetEventRequest) -> Result<GetEventResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        let event = self
            .events
            .find_by_id(&identity.id, &request.event_id)
            .await
            .map_err(map_repository_error)?;
        Ok(GetEventResponse { event })
    }

    async fn count_events(
        &self,
        request: CountEventsRequest,
    ) -> Result<CountEventsResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        let filters = self.scoped_filters(request.filters);
        let count = self
            .events
            .count(&identity.id, &filters)
            .await
            .map_err(map_repository_error)?;
        Ok(CountEventsResponse { count })
    }
}

/// Event service implementing the write driving port.
pub struct EventCommandService<P, R, I> {
    gate: AuthorizationGate<P>,
    events: Arc<R>,
    invalidator: Arc<I>,
    validator: EventValidator,
    max_events_per_user: u64,
}

impl<P, R, I> EventCommandService<P, R, I>
where
    P: IdentityProvider,
{
    /// Create a command service with the default event quota.
    pub fn new(
        provider: Arc<P>,
        events: Arc<R>,
        invalidator: Arc<I>,
        validator: EventValidator,
    ) -> Self {
        Self {
            gate: AuthorizationGate::new(provider),
            events,
            invalidator,
            validator,
            max_events_per_user: DEFAULT_MAX_EVENTS_PER_USER,
        }
    }

    /// Override the per-owner event quota.
    #[must_use]
    pub fn with_event_quota(mut self, max_events_per_user: u64) -> Self {
        self.max_events_per_user = max_events_per_user;
        self
    }
}

impl<P, R, I> EventCommandService<P, R, I>
where
    P: IdentityProvider,
    R: EventRepository,
    I: ViewInvalidator,
{
    async fn signal(&self, views: Vec<ViewPath>) -> Vec<ViewPath> {
        self.invalidator.invalidate(&views).await;
        views
    }
}

#[async_trait]
impl<P, R, I> EventsCommand for EventCommandService<P, R, I>
where
    P: IdentityProvider,
    R: EventRepository,
    I: ViewInvalidator,
{
    async fn create_event(
        &self,
        request: CreateEventRequest,
    ) -> Result<CreateEventResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        let record = self.validator.validate(request.draft)?;

        let owned = self
            .events
            .count(&identity.id, &EventFilters::default())
            .await
            .map_err(map_repository_error)?;
        if owned >= self.max_events_per_user {
            return Err(EventValidationError::QuotaExceeded {
                max: self.max_events_per_user,
            }
            .into());
        }

        let event = self
            .events
            .insert(&identity.id, &record)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %identity.id, event_id = %event.id, "event created");

        let invalidated = self.signal(vec![ViewPath::Dashboard]).await;
        Ok(CreateEventResponse { event, invalidated })
    }

    async fn update_event(
        &self,
        request: UpdateEventRequest,
    ) -> Result<UpdateEventResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        let patch = self.validator.validate_patch(request.patch)?;
        let event = self
            .events
            .update(&identity.id, &request.event_id, &patch)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %identity.id, event_id = %event.id, "event updated");

        let invalidated = self
            .signal(vec![ViewPath::Dashboard, ViewPath::EventEdit(event.id)])
            .await;
        Ok(UpdateEventResponse { event, invalidated })
    }

    async fn delete_event(
        &self,
        request: DeleteEventRequest,
    ) -> Result<DeleteEventResponse, Error> {
        let identity = self.gate.require_identity(&request.session).await?;
        self.events
            .delete(&identity.id, &request.event_id)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %identity.id, event_id = %request.event_id, "event deleted");

        let invalidated = self.signal(vec![ViewPath::Dashboard]).await;
        Ok(DeleteEventResponse { invalidated })
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
