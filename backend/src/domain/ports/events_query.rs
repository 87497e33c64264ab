//! Driving port for event read use-cases.
//!
//! Every request carries the caller's [`SessionHandle`]; implementations
//! resolve the owner from it and never from request data.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventFilters, EventId, SessionHandle};

/// Request to list the caller's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEventsRequest {
    pub session: SessionHandle,
    pub filters: EventFilters,
}

/// Events ordered by `date_time` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEventsResponse {
    pub events: Vec<Event>,
}

/// Request to count the caller's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountEventsRequest {
    pub session: SessionHandle,
    pub filters: EventFilters,
}

/// Number of matching events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountEventsResponse {
    pub count: u64,
}

/// Request to fetch one of the caller's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEventRequest {
    pub session: SessionHandle,
    pub event_id: EventId,
}

/// The requested event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEventResponse {
    pub event: Event,
}

/// Driving port for event reads.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() {
/// use matchday::domain::ports::{EventsQuery, FixtureEventsQuery, ListEventsRequest};
///
/// let result = FixtureEventsQuery.list_events(ListEventsRequest::default()).await;
/// assert!(result.is_err());
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsQuery: Send + Sync {
    /// Lists events matching the filters.
    async fn list_events(&self, request: ListEventsRequest) -> Result<ListEventsResponse, Error>;

    /// Fetches one event by id.
    async fn get_event(&self, request: GetEventRequest) -> Result<GetEventResponse, Error>;

    /// Counts events matching the filters, ignoring pagination.
    async fn count_events(&self, request: CountEventsRequest)
    -> Result<CountEventsResponse, Error>;
}

/// Fixture query that treats every caller as anonymous.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventsQuery;

#[async_trait]
impl EventsQuery for FixtureEventsQuery {
    async fn list_events(&self, _request: ListEventsRequest) -> Result<ListEventsResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }

    async fn get_event(&self, _request: GetEventRequest) -> Result<GetEventResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }

    async fn count_events(
        &self,
        _request: CountEventsRequest,
    ) -> Result<CountEventsResponse, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }
}
