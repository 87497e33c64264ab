//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed event repository using Diesel ORM
//! - **identity**: GoTrue REST client for the hosted identity provider
//! - **memory**: in-memory repository and identity provider for development
//! - **invalidation**: broadcast channel carrying stale view paths
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod invalidation;
pub mod memory;
pub mod persistence;
