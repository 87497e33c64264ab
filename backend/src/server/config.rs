//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use pagination::PageBounds;

use matchday::domain::{DEFAULT_MAX_EVENTS_PER_USER, EventLimits, SportRegistry};
use matchday::inbound::http::session_config::SessionSettings;
use matchday::outbound::identity::IdentityProviderSettings;
use matchday::outbound::persistence::DbPool;

const DEFAULT_SITE_URL: &str = "http://localhost:8080";

/// Event rules applied by the use-cases and list endpoints.
#[derive(Clone)]
pub struct EventRules {
    pub sports: Arc<SportRegistry>,
    pub limits: EventLimits,
    pub max_events_per_user: u64,
    pub page_bounds: PageBounds,
}

impl Default for EventRules {
    fn default() -> Self {
        Self {
            sports: Arc::new(SportRegistry::builtin()),
            limits: EventLimits::default(),
            max_events_per_user: DEFAULT_MAX_EVENTS_PER_USER,
            page_bounds: PageBounds::default(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<IdentityProviderSettings>,
    pub(crate) site_url: String,
    pub(crate) rules: EventRules,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity: None,
            site_url: DEFAULT_SITE_URL.to_owned(),
            rules: EventRules::default(),
        }
    }

    /// Store events in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Authenticate against a hosted identity provider instead of the
    /// in-memory directory.
    #[must_use]
    pub fn with_identity_provider(mut self, settings: IdentityProviderSettings) -> Self {
        self.identity = Some(settings);
        self
    }

    /// Public URL used by the in-memory directory for OAuth redirects.
    #[must_use]
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    #[must_use]
    pub fn with_event_rules(mut self, rules: EventRules) -> Self {
        self.rules = rules;
        self
    }
}
