//! Authentication inputs: sign-in credentials, sign-up details, and OAuth
//! providers.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use super::{AccessToken, EmailAddress, Identity};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// E-mail address was malformed.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
    /// Sign-up password shorter than [`MIN_PASSWORD_LENGTH`].
    PasswordTooShort,
    /// Sign-up confirmation was empty.
    MissingConfirmation,
    /// Sign-up confirmation did not match the password.
    PasswordMismatch,
}

impl AuthValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort => "password",
            Self::MissingConfirmation | Self::PasswordMismatch => "confirmPassword",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::EmptyPassword => write!(f, "Password is required"),
            Self::PasswordTooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ),
            Self::MissingConfirmation => write!(f, "Please confirm your password"),
            Self::PasswordMismatch => write!(f, "Passwords don't match"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and shaped like `local@domain.tld`.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use matchday::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("runner@example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "runner@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw e-mail and password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(|_| AuthValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Address used to look the account up.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    credentials: Credentials,
}

impl SignUpDetails {
    /// Validate the e-mail, password length, and confirmation.
    ///
    /// # Examples
    /// ```
    /// use matchday::domain::{AuthValidationError, SignUpDetails};
    ///
    /// let err = SignUpDetails::try_from_parts("a@b.co", "secret1", "secret2").unwrap_err();
    /// assert_eq!(err, AuthValidationError::PasswordMismatch);
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, AuthValidationError> {
        let credentials = Credentials::try_from_parts(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthValidationError::PasswordTooShort);
        }
        if confirm_password.is_empty() {
            return Err(AuthValidationError::MissingConfirmation);
        }
        if password != confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self { credentials })
    }

    /// Credentials to register.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// OAuth providers the identity provider is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    /// Google sign-in.
    Google,
}

impl OAuthProvider {
    /// Provider name as understood by the identity provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when an OAuth provider name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported OAuth provider: {0}")]
pub struct UnknownOAuthProvider(pub String);

impl FromStr for OAuthProvider {
    type Err = UnknownOAuthProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("google") {
            Ok(Self::Google)
        } else {
            Err(UnknownOAuthProvider(s.to_owned()))
        }
    }
}

/// Session issued by the identity provider after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Bearer token to present on later calls.
    pub access_token: AccessToken,
    /// Identity the token belongs to.
    pub identity: Identity,
}
