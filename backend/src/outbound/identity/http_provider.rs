//! Reqwest-backed GoTrue identity provider adapter.
//!
//! This adapter owns transport details only: endpoint construction, headers,
//! HTTP status mapping, and JSON decoding into domain identities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{ErrorDto, PasswordGrantDto, SessionDto, UserDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, AuthSession, Credentials, Identity, OAuthProvider, SignUpDetails};

const AUTH_ROOT: &str = "auth/v1/";
const CALLBACK_PATH: &str = "auth/callback";

/// Errors raised while constructing [`HttpIdentityProvider`].
#[derive(Debug, thiserror::Error)]
pub enum IdentityClientError {
    #[error("identity provider URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("identity provider URL cannot carry a path: {0}")]
    NotABase(Url),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityProviderSettings {
    /// Project URL, e.g. `https://project.supabase.co`.
    pub base_url: Url,
    /// Public (anon) API key sent on every request.
    pub api_key: String,
    /// Public site URL used to build the OAuth and sign-up redirect target.
    pub site_url: Url,
    pub timeout: Duration,
}

/// Identity provider adapter speaking the GoTrue REST dialect.
pub struct HttpIdentityProvider {
    client: Client,
    auth_root: Url,
    callback_url: Url,
    api_key: Zeroizing<String>,
}

impl HttpIdentityProvider {
    /// Build an adapter with a reqwest client honouring `settings.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityClientError`] when a URL cannot be joined or the
    /// client cannot be constructed.
    pub fn new(settings: IdentityProviderSettings) -> Result<Self, IdentityClientError> {
        let IdentityProviderSettings {
            base_url,
            api_key,
            site_url,
            timeout,
        } = settings;
        if base_url.cannot_be_a_base() {
            return Err(IdentityClientError::NotABase(base_url));
        }
        let auth_root = with_trailing_slash(base_url).join(AUTH_ROOT)?;
        let callback_url = with_trailing_slash(site_url).join(CALLBACK_PATH)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            auth_root,
            callback_url,
            api_key: Zeroizing::new(api_key),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityProviderError> {
        self.auth_root
            .join(path)
            .map_err(|err| IdentityProviderError::unavailable(format!("endpoint {path}: {err}")))
    }

    fn authorised(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .header("apikey", self.api_key.as_str())
            .bearer_auth(bearer)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn oauth_url(&self, provider: OAuthProvider) -> Result<Url, IdentityProviderError> {
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", self.callback_url.as_str());
        Ok(url)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current_user(
        &self,
        token: &AccessToken,
    ) -> Result<Option<Identity>, IdentityProviderError> {
        let url = self.endpoint("user")?;
        let response = self
            .authorised(self.client.get(url), token.expose())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!(status = status.as_u16(), "access token rejected");
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let user: UserDto = decode(body.as_ref())?;
        user.into_identity()
            .map(Some)
            .map_err(IdentityProviderError::decode)
    }

    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, IdentityProviderError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .authorised(self.client.post(url), self.api_key.as_str())
            .json(&PasswordGrantDto {
                email: credentials.email().as_ref(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_sign_in_status(status, body.as_ref()));
        }
        let session: SessionDto = decode(body.as_ref())?;
        session
            .into_session()
            .map_err(IdentityProviderError::decode)
    }

    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), IdentityProviderError> {
        let mut url = self.endpoint("signup")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", self.callback_url.as_str());
        let credentials = details.credentials();
        let response = self
            .authorised(self.client.post(url), self.api_key.as_str())
            .json(&PasswordGrantDto {
                email: credentials.email().as_ref(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), IdentityProviderError> {
        let url = self.endpoint("logout")?;
        let response = self
            .authorised(self.client.post(url), token.expose())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        // An already-expired token has nothing left to revoke.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    async fn authorize_url(
        &self,
        provider: OAuthProvider,
    ) -> Result<String, IdentityProviderError> {
        self.oauth_url(provider).map(String::from)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, IdentityProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid identity provider payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::unavailable(error.to_string())
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorDto>(body)
        .ok()
        .and_then(ErrorDto::into_message)
        .unwrap_or_else(|| format!("status {}", status.as_u16()))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let message = error_message(status, body);
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        IdentityProviderError::rejected(message)
    } else {
        IdentityProviderError::unavailable(message)
    }
}

fn map_sign_in_status(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            IdentityProviderError::invalid_credentials(error_message(status, body))
        }
        _ => map_status_error(status, body),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn provider() -> HttpIdentityProvider {
        HttpIdentityProvider::new(IdentityProviderSettings {
            base_url: Url::parse("https://project.example.co").expect("base url"),
            api_key: "anon".to_owned(),
            site_url: Url::parse("https://app.example.com").expect("site url"),
            timeout: Duration::from_secs(5),
        })
        .expect("provider builds")
    }

    #[rstest]
    fn endpoints_live_under_auth_root(provider: HttpIdentityProvider) {
        let url = provider.endpoint("token").expect("endpoint");
        assert_eq!(url.as_str(), "https://project.example.co/auth/v1/token");
    }

    #[rstest]
    fn base_path_is_preserved() {
        let provider = HttpIdentityProvider::new(IdentityProviderSettings {
            base_url: Url::parse("https://gateway.example.com/identity").expect("base url"),
            api_key: "anon".to_owned(),
            site_url: Url::parse("https://app.example.com").expect("site url"),
            timeout: Duration::from_secs(5),
        })
        .expect("provider builds");

        let url = provider.endpoint("user").expect("endpoint");

        assert_eq!(url.as_str(), "https://gateway.example.com/identity/auth/v1/user");
    }

    #[rstest]
    #[tokio::test]
    async fn oauth_url_redirects_to_site_callback(provider: HttpIdentityProvider) {
        let url = provider
            .authorize_url(OAuthProvider::Google)
            .await
            .expect("url");

        assert_eq!(
            url,
            "https://project.example.co/auth/v1/authorize?provider=google&redirect_to=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback"
        );
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, "InvalidCredentials")]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, "InvalidCredentials")]
    #[case(StatusCode::TOO_MANY_REQUESTS, "Unavailable")]
    #[case(StatusCode::FORBIDDEN, "Rejected")]
    #[case(StatusCode::BAD_GATEWAY, "Unavailable")]
    fn sign_in_statuses_map_to_port_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_sign_in_status(status, br#"{"msg":"Invalid login credentials"}"#);
        let matched = match expected {
            "InvalidCredentials" => {
                matches!(error, IdentityProviderError::InvalidCredentials { .. })
            }
            "Rejected" => matches!(error, IdentityProviderError::Rejected { .. }),
            _ => matches!(error, IdentityProviderError::Unavailable { .. }),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[rstest]
    fn provider_message_is_forwarded() {
        let error = map_sign_in_status(
            StatusCode::BAD_REQUEST,
            br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(error.to_string(), "Invalid login credentials");
    }

    #[rstest]
    fn opaque_bodies_fall_back_to_status() {
        let error = map_status_error(StatusCode::SERVICE_UNAVAILABLE, b"<html>down</html>");
        assert!(error.to_string().contains("status 503"));
    }
}
