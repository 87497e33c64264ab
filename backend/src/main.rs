//! Matchday entry-point: loads settings, prepares storage, and serves the
//! REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use matchday::config::AppSettings;
use matchday::inbound::http::health::HealthState;
use matchday::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use matchday::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{EventRules, ServerConfig, create_server};

/// Session cookie settings read from the process environment.
fn process_session_settings(mode: BuildMode) -> io::Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), mode).map_err(io::Error::other)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(io::Error::other)?;
    let session = process_session_settings(BuildMode::from_debug_assertions())?;

    let rules = EventRules {
        sports: Arc::new(settings.sport_registry().map_err(io::Error::other)?),
        limits: settings.event_limits(),
        max_events_per_user: settings.max_events_per_user(),
        page_bounds: settings.page_bounds(),
    };
    let mut config = ServerConfig::new(session, settings.bind_addr().map_err(io::Error::other)?)
        .with_site_url(settings.site_url().map_err(io::Error::other)?)
        .with_event_rules(rules);

    if let Some(identity) = settings.identity_settings().map_err(io::Error::other)? {
        config = config.with_identity_provider(identity);
    }

    if let Some(database_url) = settings.database_url.clone() {
        if settings.skip_migrations {
            info!("skipping database migrations");
        } else {
            run_migrations(database_url.clone())
                .await
                .map_err(io::Error::other)?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!("matchday listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

#[cfg(test)]
mod tests {
    //! Startup helpers exercised against the real process environment.

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn debug_builds_start_without_session_configuration() {
        let _guard = lock_env([
            ("MATCHDAY_SESSION_KEY_FILE", None::<&str>),
            ("MATCHDAY_SESSION_COOKIE_SECURE", None),
            ("MATCHDAY_SESSION_SAMESITE", None),
            ("MATCHDAY_SESSION_ALLOW_EPHEMERAL", None),
        ]);

        let settings = process_session_settings(BuildMode::Debug).expect("debug defaults");

        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn release_builds_reject_a_missing_key_file() {
        let _guard = lock_env([
            ("MATCHDAY_SESSION_KEY_FILE", Some("/nonexistent/matchday_session_key")),
            ("MATCHDAY_SESSION_COOKIE_SECURE", Some("1")),
            ("MATCHDAY_SESSION_SAMESITE", Some("Strict")),
            ("MATCHDAY_SESSION_ALLOW_EPHEMERAL", Some("0")),
        ]);

        assert!(process_session_settings(BuildMode::Release).is_err());
    }
}
