//! Builders wiring outbound adapters into the HTTP state.
//!
//! Each driven port has a production adapter and an in-memory fallback; the
//! fallback is chosen when the corresponding setting is absent.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use matchday::domain::ports::{EventRepository, IdentityProvider};
use matchday::domain::{
    AuthenticationService, EventCommandService, EventQueryService, EventValidator,
};
use matchday::inbound::http::state::{HttpState, HttpStatePorts};
use matchday::outbound::identity::HttpIdentityProvider;
use matchday::outbound::invalidation::BroadcastViewInvalidator;
use matchday::outbound::memory::{InMemoryEventRepository, InMemoryIdentityProvider};
use matchday::outbound::persistence::DieselEventRepository;

use super::ServerConfig;
use super::config::EventRules;

/// Build the driving ports over one provider and one repository.
fn build_ports<P, R>(
    provider: Arc<P>,
    events: Arc<R>,
    invalidator: Arc<BroadcastViewInvalidator>,
    rules: &EventRules,
) -> HttpStatePorts
where
    P: IdentityProvider + 'static,
    R: EventRepository + 'static,
{
    let validator = EventValidator::new(rules.limits, Arc::clone(&rules.sports));
    let query = EventQueryService::new(
        Arc::clone(&provider),
        Arc::clone(&events),
        Arc::clone(&rules.sports),
    );
    let command = EventCommandService::new(Arc::clone(&provider), events, invalidator, validator)
        .with_event_quota(rules.max_events_per_user);
    HttpStatePorts {
        events_query: Arc::new(query),
        events_command: Arc::new(command),
        auth: Arc::new(AuthenticationService::new(provider)),
    }
}

fn with_repository<P>(
    config: &ServerConfig,
    provider: Arc<P>,
    invalidator: Arc<BroadcastViewInvalidator>,
) -> HttpStatePorts
where
    P: IdentityProvider + 'static,
{
    match &config.db_pool {
        Some(pool) => build_ports(
            provider,
            Arc::new(DieselEventRepository::new(pool.clone())),
            invalidator,
            &config.rules,
        ),
        None => {
            warn!("no database configured; events are kept in memory");
            build_ports(
                provider,
                Arc::new(InMemoryEventRepository::default()),
                invalidator,
                &config.rules,
            )
        }
    }
}

/// Assemble [`HttpState`] from the configured adapters.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the identity provider client cannot be
/// built.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    invalidator: Arc<BroadcastViewInvalidator>,
) -> std::io::Result<HttpState> {
    let ports = match &config.identity {
        Some(settings) => {
            let provider = HttpIdentityProvider::new(settings.clone()).map_err(|err| {
                std::io::Error::other(format!("identity provider client: {err}"))
            })?;
            info!(url = %settings.base_url, "using hosted identity provider");
            with_repository(config, Arc::new(provider), invalidator)
        }
        None => {
            warn!("no identity provider configured; using the in-memory directory (dev only)");
            let provider =
                InMemoryIdentityProvider::new(Arc::new(DefaultClock), config.site_url.clone());
            with_repository(config, Arc::new(provider), invalidator)
        }
    };
    Ok(HttpState::new(ports)
        .with_sports(Arc::clone(&config.rules.sports))
        .with_page_bounds(config.rules.page_bounds))
}
