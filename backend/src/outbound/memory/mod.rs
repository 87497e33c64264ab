//! In-memory adapters backing development servers and integration tests.

mod event_repository;
mod identity_provider;

pub use event_repository::InMemoryEventRepository;
pub use identity_provider::InMemoryIdentityProvider;
