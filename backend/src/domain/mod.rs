//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Identity and SessionHandle: who is calling and how they prove it.
//! - Event, EventDraft, EventPatch, EventValidator: the event aggregate and
//!   its input normalisation.
//! - EventQueryService, EventCommandService, AuthenticationService: driving
//!   port implementations.

pub mod auth;
pub mod authentication_service;
pub mod authorization;
pub mod error;
pub mod event_service;
pub mod events;
pub mod identity;
pub mod ports;
pub mod trace_id;

pub use self::auth::{
    AuthSession, AuthValidationError, Credentials, MIN_PASSWORD_LENGTH, OAuthProvider,
    SignUpDetails, UnknownOAuthProvider,
};
pub use self::authentication_service::AuthenticationService;
pub use self::authorization::{AuthorizationGate, IdentityResolver, NOT_AUTHENTICATED};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event_service::{
    DEFAULT_MAX_EVENTS_PER_USER, EventCommandService, EventQueryService,
};
pub use self::events::{
    ALL_SPORTS, Event, EventColor, EventDraft, EventFilters, EventId, EventLimits, EventPatch,
    EventSchedule, EventValidationError, EventValidator, ParseEventColorError, Sport,
    SportCategory, SportRegistry, SportSpecError, ValidatedEvent, ValidatedPatch,
};
pub use self::identity::{
    AccessToken, EmailAddress, Identity, IdentityValidationError, SessionHandle, UserId,
};
pub use self::trace_id::TraceId;
