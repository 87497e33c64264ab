//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! The cookie session stores only the provider-issued access token; every
//! request turns it into an explicit [`SessionHandle`] for the use-cases.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AccessToken, Error, SessionHandle};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the access token after a successful sign-in.
    pub fn persist_token(&self, token: &AccessToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCESS_TOKEN_KEY, token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Session handle for the current caller; anonymous when no token is held.
    pub fn handle(&self) -> Result<SessionHandle, Error> {
        let raw = self
            .0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(SessionHandle::anonymous());
        };
        match AccessToken::new(raw) {
            Ok(token) => Ok(SessionHandle::from_token(token)),
            Err(error) => {
                warn!(%error, "discarding malformed access token from session cookie");
                Ok(SessionHandle::anonymous())
            }
        }
    }

    /// Drop everything held in the session cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
