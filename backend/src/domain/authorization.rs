//! Identity resolution and the authorisation gate.
//!
//! The gate is the single enforcement point for signed-in access: every
//! event use-case calls [`AuthorizationGate::require_identity`] first and
//! scopes repository calls with the identity it returns.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::IdentityProvider;
use crate::domain::{Error, Identity, SessionHandle};

/// Message returned whenever a use-case needs an identity and has none.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Maps a session handle to the identity behind it.
pub struct IdentityResolver<P> {
    provider: Arc<P>,
}

impl<P> Clone for IdentityResolver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> IdentityResolver<P>
where
    P: IdentityProvider,
{
    /// Resolve identities through `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Current identity, or `None` for anonymous callers.
    ///
    /// Missing or expired tokens yield `None`. Provider faults are logged
    /// and also yield `None`; no token refresh is attempted.
    pub async fn resolve(&self, session: &SessionHandle) -> Option<Identity> {
        let token = session.access_token()?;
        match self.provider.current_user(token).await {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "identity lookup failed; treating caller as anonymous");
                None
            }
        }
    }
}

/// Turns "no identity" into [`crate::domain::ErrorCode::Unauthorized`].
pub struct AuthorizationGate<P> {
    resolver: IdentityResolver<P>,
}

impl<P> Clone for AuthorizationGate<P> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}

impl<P> AuthorizationGate<P>
where
    P: IdentityProvider,
{
    /// Gate backed by a resolver over `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            resolver: IdentityResolver::new(provider),
        }
    }

    /// Resolve the caller or fail with `unauthorized`.
    pub async fn require_identity(&self, session: &SessionHandle) -> Result<Identity, Error> {
        self.resolver
            .resolve(session)
            .await
            .ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))
    }
}
