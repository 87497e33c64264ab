//! Multi-tenant sports event service.
//!
//! The crate follows a hexagonal layout: `domain` owns the event aggregate,
//! validation and use-cases; `inbound` adapts HTTP requests onto the driving
//! ports; `outbound` implements the driven ports for PostgreSQL, the identity
//! provider and view invalidation.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
