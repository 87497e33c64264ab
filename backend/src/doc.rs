//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{IdentityBody, LoginRequest, SignUpRequest, SignUpResponse};
use crate::inbound::http::events::{
    CreateEventBody, EventBody, EventCountBody, UpdateEventBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::sports::SportBody;

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Matchday API",
        description = "Per-user sports event scheduling behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::count_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::oauth_redirect,
        crate::inbound::http::auth::me,
        crate::inbound::http::sports::list_sports,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        EventBody,
        EventCountBody,
        CreateEventBody,
        UpdateEventBody,
        LoginRequest,
        SignUpRequest,
        SignUpResponse,
        IdentityBody,
        SportBody,
    )),
    tags(
        (name = "events", description = "The caller's sports events"),
        (name = "auth", description = "Sign-in, sign-up and session management"),
        (name = "sports", description = "Selectable sports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
