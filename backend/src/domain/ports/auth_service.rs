//! Driving port for authentication use-cases.
//!
//! Inbound adapters call it to sign callers in and out without knowing which
//! identity provider backs the deployment. HTTP handler tests substitute a
//! test double instead of wiring a provider.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, Credentials, Error, Identity, OAuthProvider, SessionHandle, SignUpDetails,
};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a provider session.
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthSession, Error>;

    /// Register a new account.
    async fn sign_up(&self, details: SignUpDetails) -> Result<(), Error>;

    /// Revoke the caller's session. Anonymous callers succeed trivially.
    async fn sign_out(&self, session: SessionHandle) -> Result<(), Error>;

    /// OAuth authorise URL for `provider`.
    async fn oauth_url(&self, provider: OAuthProvider) -> Result<String, Error>;

    /// Identity behind the caller's session.
    async fn current_identity(&self, session: SessionHandle) -> Result<Identity, Error>;
}

/// Fixture authenticator that knows no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthService;

#[async_trait]
impl AuthService for FixtureAuthService {
    async fn sign_in(&self, _credentials: Credentials) -> Result<AuthSession, Error> {
        Err(Error::unauthorized("Invalid login credentials"))
    }

    async fn sign_up(&self, _details: SignUpDetails) -> Result<(), Error> {
        Ok(())
    }

    async fn sign_out(&self, _session: SessionHandle) -> Result<(), Error> {
        Ok(())
    }

    async fn oauth_url(&self, provider: OAuthProvider) -> Result<String, Error> {
        Ok(format!("https://identity.invalid/authorize?provider={provider}"))
    }

    async fn current_identity(&self, _session: SessionHandle) -> Result<Identity, Error> {
        Err(Error::unauthorized("Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_rejects_every_sign_in() {
        let creds =
            Credentials::try_from_parts("runner@example.com", "secret").expect("credentials");
        let err = FixtureAuthService
            .sign_in(creds)
            .await
            .expect_err("fixture knows no accounts");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_treats_callers_as_anonymous() {
        let err = FixtureAuthService
            .current_identity(SessionHandle::anonymous())
            .await
            .expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
