//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; no business rules live here. Row structs (`models.rs`) and the
//! table definitions (`schema.rs`) stay private to this module. Connections
//! come from a `bb8` pool via `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use matchday::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/matchday")).await?;
//! let repo = DieselEventRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_event_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use migrations::{MigrationError, apply_migrations, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
