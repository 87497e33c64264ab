//! Driven port for the hosted identity provider.
//!
//! Session issuance, password hashing, and OAuth redirects all live behind
//! this boundary; the domain only sees identities and access tokens.

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthSession, Credentials, Identity, OAuthProvider, SignUpDetails};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider refused the supplied credentials.
        InvalidCredentials { message: String } => "{message}",
        /// The provider rejected the request for another reason.
        Rejected { message: String } => "{message}",
        /// The provider could not be reached or answered with a server fault.
        Unavailable { message: String } =>
            "identity provider unavailable: {message}",
        /// The provider answered with a payload that could not be decoded.
        Decode { message: String } =>
            "identity provider response invalid: {message}",
    }
}

/// Port for authenticating callers against the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the identity behind `token`.
    ///
    /// Returns `Ok(None)` for expired or rejected tokens; errors are reserved
    /// for transport faults.
    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Identity>, IdentityProviderError>;

    /// Exchange e-mail and password for a session.
    async fn sign_in(&self, credentials: &Credentials)
    -> Result<AuthSession, IdentityProviderError>;

    /// Register a new account. Confirmation happens out of band.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError>;

    /// Revoke the session behind `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError>;

    /// URL the browser should visit to start an OAuth sign-in.
    async fn authorize_url(&self, provider: OAuthProvider)
    -> Result<String, IdentityProviderError>;
}

/// Fixture provider that knows no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn current_user(
        &self,
        _token: &AccessToken,
    ) -> Result<Option<Identity>, IdentityProviderError> {
        Ok(None)
    }

    async fn sign_in(
        &self,
        _credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        Err(IdentityProviderError::invalid_credentials(
            "Invalid login credentials",
        ))
    }

    async fn sign_up(&self, _details: &SignUpDetails) -> Result<(), IdentityProviderError> {
        Ok(())
    }

    async fn sign_out(&self, _token: &AccessToken) -> Result<(), IdentityProviderError> {
        Ok(())
    }

    async fn authorize_url(
        &self,
        provider: OAuthProvider,
    ) -> Result<String, IdentityProviderError> {
        Ok(format!("https://identity.invalid/authorize?provider={provider}"))
    }
}
