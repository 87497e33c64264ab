//! Identity provider adapters.
//!
//! `HttpIdentityProvider` talks to a hosted GoTrue service;
//! `InMemoryIdentityProvider` lives under `outbound::memory` for development
//! and tests.

mod dto;
mod http_provider;

pub use http_provider::{HttpIdentityProvider, IdentityClientError, IdentityProviderSettings};
