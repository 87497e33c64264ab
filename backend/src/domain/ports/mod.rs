//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`EventsQuery`, `EventsCommand`, `AuthService`) are what
//! inbound adapters call. Driven ports (`EventRepository`,
//! `IdentityProvider`, `ViewInvalidator`) are what outbound adapters
//! implement.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod event_repository;
mod events_command;
mod events_query;
mod identity_provider;
mod view_invalidator;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, FixtureAuthService};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError, FixtureEventRepository};
#[cfg(test)]
pub use events_command::MockEventsCommand;
pub use events_command::{
    CreateEventRequest, CreateEventResponse, DeleteEventRequest, DeleteEventResponse,
    EventsCommand, FixtureEventsCommand, UpdateEventRequest, UpdateEventResponse,
};
#[cfg(test)]
pub use events_query::MockEventsQuery;
pub use events_query::{
    CountEventsRequest, CountEventsResponse, EventsQuery, FixtureEventsQuery, GetEventRequest,
    GetEventResponse, ListEventsRequest, ListEventsResponse,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use view_invalidator::MockViewInvalidator;
pub use view_invalidator::{FixtureViewInvalidator, ViewInvalidator, ViewPath};
