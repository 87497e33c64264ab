//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod events;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod sports;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// Static segments are registered before `{id}` so `/events/count` is not
/// captured as an event id.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(events::list_events)
        .service(events::count_events)
        .service(events::get_event)
        .service(events::create_event)
        .service(events::update_event)
        .service(events::delete_event)
        .service(auth::login)
        .service(auth::sign_up)
        .service(auth::logout)
        .service(auth::oauth_redirect)
        .service(auth::me)
        .service(sports::list_sports);
}
