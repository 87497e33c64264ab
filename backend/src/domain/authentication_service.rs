//! Authentication use-cases backed by the identity provider port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::authorization::AuthorizationGate;
use crate::domain::ports::{AuthService, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthSession, Credentials, Error, Identity, OAuthProvider, SessionHandle, SignUpDetails,
};

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::InvalidCredentials { message }
        | IdentityProviderError::Rejected { message } => Error::unauthorized(message),
        IdentityProviderError::Unavailable { message } => {
            warn!(%message, "identity provider unavailable");
            Error::service_unavailable("Authentication service unavailable")
        }
        IdentityProviderError::Decode { message } => {
            Error::internal(format!("identity provider response invalid: {message}"))
        }
    }
}

/// Authentication service implementing the [`AuthService`] driving port.
pub struct AuthenticationService<P> {
    provider: Arc<P>,
    gate: AuthorizationGate<P>,
}

impl<P> AuthenticationService<P>
where
    P: IdentityProvider,
{
    /// Service delegating to `provider`.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            gate: AuthorizationGate::new(Arc::clone(&provider)),
            provider,
        }
    }
}

#[async_trait]
impl<P> AuthService for AuthenticationService<P>
where
    P: IdentityProvider,
{
    async fn sign_in(&self, credentials: Credentials) -> Result<AuthSession, Error> {
        let session = self
            .provider
            .sign_in(&credentials)
            .await
            .map_err(map_provider_error)?;
        info!(user_id = %session.identity.id, "user signed in");
        Ok(session)
    }

    async fn sign_up(&self, details: SignUpDetails) -> Result<(), Error> {
        self.provider
            .sign_up(&details)
            .await
            .map_err(map_provider_error)
    }

    async fn sign_out(&self, session: SessionHandle) -> Result<(), Error> {
        let Some(token) = session.access_token() else {
            return Ok(());
        };
        self.provider
            .sign_out(token)
            .await
            .map_err(map_provider_error)
    }

    async fn oauth_url(&self, provider: OAuthProvider) -> Result<String, Error> {
        self.provider
            .authorize_url(provider)
            .await
            .map_err(map_provider_error)
    }

    async fn current_identity(&self, session: SessionHandle) -> Result<Identity, Error> {
        self.gate.require_identity(&session).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockIdentityProvider;
    use crate::domain::{AccessToken, EmailAddress, ErrorCode, UserId};

    fn credentials() -> Credentials {
        Credentials::try_from_parts("runner@example.com", "secret").expect("credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn sign_in_returns_provider_session() {
        let identity = Identity {
            id: UserId::random(),
            email: EmailAddress::new("runner@example.com").expect("email"),
            created_at: Utc::now(),
        };
        let session = AuthSession {
            access_token: AccessToken::new("issued").expect("token"),
            identity,
        };
        let expected = session.clone();
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .withf(|creds| creds.email().as_ref() == "runner@example.com")
            .times(1)
            .return_once(move |_| Ok(session));
        let service = AuthenticationService::new(Arc::new(provider));

        let issued = service.sign_in(credentials()).await.expect("sign in");

        assert_eq!(issued, expected);
    }

    #[rstest]
    #[case(IdentityProviderError::invalid_credentials("Invalid login credentials"), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::rejected("Email not confirmed"), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::unavailable("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::decode("missing user"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn sign_in_maps_provider_errors(
        #[case] failure: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_in()
            .times(1)
            .return_once(move |_| Err(failure));
        let service = AuthenticationService::new(Arc::new(provider));

        let error = service.sign_in(credentials()).await.expect_err("failure");

        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_sign_out_skips_the_provider() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_sign_out().times(0);
        let service = AuthenticationService::new(Arc::new(provider));

        service
            .sign_out(SessionHandle::anonymous())
            .await
            .expect("anonymous sign out succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn sign_out_revokes_the_token() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_sign_out()
            .withf(|token| token.expose() == "issued")
            .times(1)
            .return_once(|_| Ok(()));
        let service = AuthenticationService::new(Arc::new(provider));
        let session = SessionHandle::from_token(AccessToken::new("issued").expect("token"));

        service.sign_out(session).await.expect("sign out succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn oauth_url_is_forwarded() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_authorize_url()
            .withf(|provider| *provider == OAuthProvider::Google)
            .times(1)
            .return_once(|_| Ok("https://auth.example/authorize?provider=google".to_owned()));
        let service = AuthenticationService::new(Arc::new(provider));

        let url = service
            .oauth_url(OAuthProvider::Google)
            .await
            .expect("url");

        assert!(url.ends_with("provider=google"));
    }
}
