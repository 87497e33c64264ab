//! DTOs for the GoTrue REST payloads.
//!
//! Responses decode into these transport shapes first and are mapped into
//! domain identities in one pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, AuthSession, EmailAddress, Identity, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

/// Error body; GoTrue versions disagree on which field carries the text.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorDto {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl UserDto {
    pub(super) fn into_identity(self) -> Result<Identity, String> {
        let id = UserId::new(&self.id).map_err(|err| format!("user id {}: {err}", self.id))?;
        let raw_email = self
            .email
            .ok_or_else(|| format!("user {id} has no e-mail address"))?;
        let email = EmailAddress::new(&raw_email).map_err(|err| format!("user {id}: {err}"))?;
        Ok(Identity {
            id,
            email,
            created_at: self.created_at,
        })
    }
}

impl SessionDto {
    pub(super) fn into_session(self) -> Result<AuthSession, String> {
        let access_token = AccessToken::new(self.access_token).map_err(|err| err.to_string())?;
        let identity = self.user.into_identity()?;
        Ok(AuthSession {
            access_token,
            identity,
        })
    }
}

impl ErrorDto {
    pub(super) fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn session_payload_maps_to_domain() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "email": "runner@example.com",
                "created_at": "2025-06-01T09:00:00Z"
            }
        }"#;

        let dto: SessionDto = serde_json::from_str(body).expect("decode");
        let session = dto.into_session().expect("maps");

        assert_eq!(session.access_token.expose(), "jwt");
        assert_eq!(session.identity.email.as_ref(), "runner@example.com");
    }

    #[rstest]
    fn user_without_email_is_rejected() {
        let dto = UserDto {
            id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            email: None,
            created_at: Utc::now(),
        };

        assert!(dto.into_identity().is_err());
    }

    #[rstest]
    #[case(r#"{"msg":"Invalid login credentials"}"#, Some("Invalid login credentials"))]
    #[case(r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#, Some("Email not confirmed"))]
    #[case(r#"{"message":"  "}"#, None)]
    #[case("{}", None)]
    fn error_message_prefers_most_specific_field(
        #[case] body: &str,
        #[case] expected: Option<&str>,
    ) {
        let dto: ErrorDto = serde_json::from_str(body).expect("decode");
        assert_eq!(dto.into_message().as_deref(), expected);
    }
}
