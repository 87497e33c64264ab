//! Identity primitives sourced from the hosted identity provider.
//!
//! An [`Identity`] is read-only inside this service: the provider issues it
//! and the domain only consumes it to scope data access. A [`SessionHandle`]
//! is the opaque credential a caller presents on every use-case call.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors for identity primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// The user id was empty.
    EmptyId,
    /// The user id was not a UUID.
    InvalidId,
    /// The e-mail address did not look like `local@domain.tld`.
    InvalidEmail,
    /// The access token was blank.
    EmptyToken,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::EmptyToken => write!(f, "access token must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Stable user identifier issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Trimmed e-mail address with a plausible `local@domain.tld` shape.
///
/// # Examples
/// ```
/// use matchday::domain::EmailAddress;
///
/// let email = EmailAddress::new("  runner@example.com ").unwrap();
/// assert_eq!(email.as_ref(), "runner@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.as_ref().trim();
        if !email_regex().is_match(trimmed) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated actor as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-issued user id; the sole scope for event access.
    pub id: UserId,
    /// Primary e-mail address.
    pub email: EmailAddress,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Bearer credential issued by the identity provider.
///
/// The secret is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyToken);
        }
        Ok(Self(raw))
    }

    /// Expose the secret for transport to the provider.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(**redacted**)")
    }
}

/// Opaque caller credential passed explicitly into every use-case call.
///
/// A handle without a token represents an anonymous caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHandle {
    access_token: Option<AccessToken>,
}

impl SessionHandle {
    /// Handle for a caller with no session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Handle carrying a provider-issued access token.
    pub fn from_token(access_token: AccessToken) -> Self {
        Self {
            access_token: Some(access_token),
        }
    }

    /// Access token, if the caller has one.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity primitives.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentityValidationError::EmptyId)]
    #[case("not-a-uuid", IdentityValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentityValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: IdentityValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn user_id_round_trips_through_serde() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialise id");
        let decoded: UserId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(decoded, id);
    }

    #[rstest]
    #[case("runner@example.com", true)]
    #[case("  coach@club.org  ", true)]
    #[case("no-at-sign.example.com", false)]
    #[case("two words@example.com", false)]
    #[case("missing@tld", false)]
    #[case("", false)]
    fn email_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn access_token_rejects_blank_and_redacts_debug() {
        assert_eq!(
            AccessToken::new("   ").expect_err("blank token"),
            IdentityValidationError::EmptyToken
        );
        let token = AccessToken::new("secret-value").expect("token");
        assert!(!format!("{token:?}").contains("secret-value"));
        assert_eq!(token.expose(), "secret-value");
    }

    #[rstest]
    fn anonymous_handle_has_no_token() {
        assert!(SessionHandle::anonymous().access_token().is_none());
    }
}
