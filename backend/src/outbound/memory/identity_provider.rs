//! In-memory identity provider for development and tests.
//!
//! Accounts and issued tokens live in process memory. Passwords are kept in
//! zeroising buffers but compared in plain text; never expose this adapter
//! outside local development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{
    AccessToken, AuthSession, Credentials, EmailAddress, Identity, OAuthProvider, SignUpDetails,
    UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";

struct Account {
    identity: Identity,
    password: Zeroizing<String>,
}

#[derive(Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, UserId>,
}

impl Directory {
    fn identity(&self, id: &UserId) -> Option<&Identity> {
        self.accounts
            .values()
            .map(|account| &account.identity)
            .find(|identity| identity.id == *id)
    }
}

/// Process-local identity provider.
pub struct InMemoryIdentityProvider {
    directory: Mutex<Directory>,
    clock: Arc<dyn Clock>,
    site_url: String,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new(Arc::new(mockable::DefaultClock), "http://localhost:8080")
    }
}

impl InMemoryIdentityProvider {
    /// Empty directory; OAuth URLs point back at `site_url`.
    pub fn new(clock: Arc<dyn Clock>, site_url: impl Into<String>) -> Self {
        Self {
            directory: Mutex::new(Directory::default()),
            clock,
            site_url: site_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn directory(&self) -> Result<MutexGuard<'_, Directory>, IdentityProviderError> {
        self.directory
            .lock()
            .map_err(|_| IdentityProviderError::unavailable("in-memory directory lock poisoned"))
    }

    /// Register an account and issue a token for it in one step.
    ///
    /// # Errors
    ///
    /// Fails when the e-mail is already registered.
    pub fn seed_session(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut directory = self.directory()?;
        let identity = register(&mut directory, email, password, self.clock.as_ref())?;
        issue(&mut directory, identity)
    }
}

fn register(
    directory: &mut Directory,
    email: &EmailAddress,
    password: &str,
    clock: &dyn Clock,
) -> Result<Identity, IdentityProviderError> {
    let key = email.as_ref().to_lowercase();
    if directory.accounts.contains_key(&key) {
        return Err(IdentityProviderError::rejected(ALREADY_REGISTERED));
    }
    let identity = Identity {
        id: UserId::random(),
        email: email.clone(),
        created_at: clock.utc(),
    };
    directory.accounts.insert(
        key,
        Account {
            identity: identity.clone(),
            password: Zeroizing::new(password.to_owned()),
        },
    );
    Ok(identity)
}

fn issue(
    directory: &mut Directory,
    identity: Identity,
) -> Result<AuthSession, IdentityProviderError> {
    let raw = Uuid::new_v4().simple().to_string();
    let access_token =
        AccessToken::new(raw.clone()).map_err(|err| IdentityProviderError::decode(err.to_string()))?;
    directory.tokens.insert(raw, identity.id);
    Ok(AuthSession {
        access_token,
        identity,
    })
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Identity>, IdentityProviderError> {
        let directory = self.directory()?;
        Ok(directory
            .tokens
            .get(token.expose())
            .and_then(|id| directory.identity(id))
            .cloned())
    }

    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut directory = self.directory()?;
        let identity = directory
            .accounts
            .get(&credentials.email().as_ref().to_lowercase())
            .filter(|account| account.password.as_str() == credentials.password())
            .map(|account| account.identity.clone())
            .ok_or_else(|| IdentityProviderError::invalid_credentials(INVALID_CREDENTIALS))?;
        issue(&mut directory, identity)
    }

    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError> {
        let credentials = details.credentials();
        let mut directory = self.directory()?;
        register(
            &mut directory,
            credentials.email(),
            credentials.password(),
            self.clock.as_ref(),
        )
        .map(|_| ())
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError> {
        self.directory()?.tokens.remove(token.expose());
        Ok(())
    }

    async fn authorize_url(
        &self,
        provider: OAuthProvider,
    ) -> Result<String, IdentityProviderError> {
        Ok(format!(
            "{}/auth/callback?provider={}",
            self.site_url,
            provider.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::default()
    }

    fn details(email: &str, password: &str) -> SignUpDetails {
        SignUpDetails::try_from_parts(email, password, password).expect("details")
    }

    #[rstest]
    #[tokio::test]
    async fn sign_up_then_sign_in_resolves_identity(provider: InMemoryIdentityProvider) {
        provider
            .sign_up(&details("runner@example.com", "secret1"))
            .await
            .expect("sign up");
        let credentials =
            Credentials::try_from_parts("Runner@Example.com", "secret1").expect("credentials");

        let session = provider.sign_in(&credentials).await.expect("sign in");
        let resolved = provider
            .current_user(&session.access_token)
            .await
            .expect("lookup");

        assert_eq!(resolved, Some(session.identity));
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_invalid_credentials(provider: InMemoryIdentityProvider) {
        provider
            .sign_up(&details("runner@example.com", "secret1"))
            .await
            .expect("sign up");
        let credentials =
            Credentials::try_from_parts("runner@example.com", "nope").expect("credentials");

        let error = provider.sign_in(&credentials).await.expect_err("rejected");

        assert_eq!(error.to_string(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_sign_up_is_rejected(provider: InMemoryIdentityProvider) {
        let request = details("runner@example.com", "secret1");
        provider.sign_up(&request).await.expect("first");

        let error = provider.sign_up(&request).await.expect_err("second");

        assert!(matches!(error, IdentityProviderError::Rejected { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn signed_out_tokens_stop_resolving(provider: InMemoryIdentityProvider) {
        let email = EmailAddress::new("runner@example.com").expect("email");
        let session = provider.seed_session(&email, "secret1").expect("seed");

        provider
            .sign_out(&session.access_token)
            .await
            .expect("sign out");

        let resolved = provider
            .current_user(&session.access_token)
            .await
            .expect("lookup");
        assert!(resolved.is_none());
    }
}
