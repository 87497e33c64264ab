//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"runner@example.com","password":"secret"}
//! POST /api/v1/auth/signup {"email":"...","password":"...","confirmPassword":"..."}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/oauth/google
//! GET  /api/v1/auth/me
//! ```
//!
//! The cookie session only ever holds the provider-issued access token.

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    AuthValidationError, Credentials, Error, Identity, OAuthProvider, SignUpDetails,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = AuthValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Sign-up request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl TryFrom<SignUpRequest> for SignUpDetails {
    type Error = AuthValidationError;

    fn try_from(value: SignUpRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password, &value.confirm_password)
    }
}

/// Identity payload returned by login and `me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "email")]
    pub email: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Identity> for IdentityBody {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.to_string(),
            created_at: identity.created_at.to_rfc3339(),
        }
    }
}

/// Confirmation returned after a sign-up request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpResponse {
    pub message: String,
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let code = match err {
        AuthValidationError::InvalidEmail => "invalid_email",
        AuthValidationError::EmptyPassword => "empty_password",
        AuthValidationError::PasswordTooShort => "password_too_short",
        AuthValidationError::MissingConfirmation => "missing_confirmation",
        AuthValidationError::PasswordMismatch => "password_mismatch",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": code }))
}

/// Exchange credentials for a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = IdentityBody,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<IdentityBody>> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    let issued = state.auth.sign_in(credentials).await?;
    session.persist_token(&issued.access_token)?;
    Ok(web::Json(IdentityBody::from(issued.identity)))
}

/// Register a new account; the provider sends a confirmation e-mail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account registered", body = SignUpResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Registration rejected", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let details =
        SignUpDetails::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    state.auth.sign_up(details).await?;
    Ok(HttpResponse::Created().json(SignUpResponse {
        message: "Check your email to confirm your account".to_owned(),
    }))
}

/// Revoke the provider session and clear the cookie.
///
/// The cookie is cleared even when revocation fails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let handle = session.handle()?;
    session.purge();
    if let Err(error) = state.auth.sign_out(handle).await {
        warn!(code = ?error.code(), "provider sign-out failed after clearing the session");
        return Err(error);
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Redirect the browser to the provider's OAuth consent screen.
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/{provider}",
    params(("provider" = String, Path, example = "google", description = "OAuth provider")),
    responses(
        (status = 302, description = "Redirect to the provider",
            headers(("Location" = String, description = "Authorise URL"))),
        (status = 400, description = "Unsupported provider", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "oauthRedirect",
    security([])
)]
#[get("/auth/oauth/{provider}")]
pub async fn oauth_redirect(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let provider: OAuthProvider = raw.parse().map_err(|err: crate::domain::UnknownOAuthProvider| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "provider",
            "value": raw,
            "code": "unsupported_provider",
        }))
    })?;
    let url = state.auth.oauth_url(provider).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

/// Identity behind the current session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentIdentity",
    security(("SessionCookie" = []))
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<IdentityBody>> {
    let identity = state.auth.current_identity(session.handle()?).await?;
    Ok(web::Json(IdentityBody::from(identity)))
}

#[cfg(test)]
mod tests {
    //! Handler coverage with a mocked authentication port.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{MockAuthService, AuthService};
    use crate::domain::{AccessToken, AuthSession, EmailAddress, UserId};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn identity() -> Identity {
        Identity {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
            email: EmailAddress::new("runner@example.com").expect("email"),
            created_at: Utc
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    fn test_app(
        auth: Arc<dyn AuthService>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(HttpStatePorts {
            auth,
            ..HttpStatePorts::default()
        });
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(sign_up)
                    .service(logout)
                    .service(oauth_redirect)
                    .service(me),
            )
    }

    fn signed_in_auth() -> MockAuthService {
        let mut auth = MockAuthService::new();
        auth.expect_sign_in().returning(|_| {
            Ok(AuthSession {
                access_token: AccessToken::new("issued-token").expect("token"),
                identity: identity(),
            })
        });
        auth
    }

    #[actix_web::test]
    async fn login_sets_cookie_and_me_reads_it_back() {
        let mut auth = signed_in_auth();
        auth.expect_current_identity()
            .withf(|session| {
                session
                    .access_token()
                    .is_some_and(|token| token.expose() == "issued-token")
            })
            .times(1)
            .returning(|_| Ok(identity()));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "runner@example.com", "password": "secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        let cookie = session_cookie(&login_res);
        let body: Value = actix_test::read_body_json(login_res).await;
        assert_eq!(body["email"], "runner@example.com");

        let me_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me_res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(me_res).await;
        assert_eq!(body["id"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case(json!({"email": "nope", "password": "secret"}), "email", "invalid_email")]
    #[case(json!({"email": "runner@example.com", "password": ""}), "password", "empty_password")]
    #[actix_web::test]
    async fn login_validation_names_the_field(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mut auth = MockAuthService::new();
        auth.expect_sign_in().times(0);
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn rejected_credentials_are_unauthorised() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_in()
            .returning(|_| Err(Error::unauthorized("Invalid login credentials")));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "runner@example.com", "password": "wrong"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().all(|cookie| cookie.name() != "session"));
    }

    #[actix_web::test]
    async fn mismatched_sign_up_confirmation_is_rejected() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_up().times(0);
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(json!({
                    "email": "runner@example.com",
                    "password": "secret1",
                    "confirmPassword": "secret2"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "confirmPassword");
    }

    #[actix_web::test]
    async fn sign_up_is_created() {
        let mut auth = MockAuthService::new();
        auth.expect_sign_up().times(1).returning(|_| Ok(()));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(json!({
                    "email": "runner@example.com",
                    "password": "secret1",
                    "confirmPassword": "secret1"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn logout_revokes_token_and_clears_cookie() {
        let mut auth = signed_in_auth();
        auth.expect_sign_out()
            .withf(|session| session.access_token().is_some())
            .times(1)
            .returning(|_| Ok(()));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;
        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "runner@example.com", "password": "secret"}))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cleared = session_cookie(&res);
        assert!(cleared.value().is_empty());
    }

    #[rstest]
    #[case("google", StatusCode::FOUND)]
    #[case("GOOGLE", StatusCode::FOUND)]
    #[case("myspace", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn oauth_redirect_resolves_providers(
        #[case] provider: &str,
        #[case] expected: StatusCode,
    ) {
        let mut auth = MockAuthService::new();
        auth.expect_oauth_url()
            .returning(|_| Ok("https://id.example/authorize?provider=google".to_owned()));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/auth/oauth/{provider}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), expected);
        if expected == StatusCode::FOUND {
            let location = res
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok());
            assert_eq!(location, Some("https://id.example/authorize?provider=google"));
        }
    }

    #[actix_web::test]
    async fn me_without_session_is_unauthorised() {
        let mut auth = MockAuthService::new();
        auth.expect_current_identity()
            .withf(|session| session.access_token().is_none())
            .returning(|_| Err(Error::unauthorized("Not authenticated")));
        let app = actix_test::init_service(test_app(Arc::new(auth))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
