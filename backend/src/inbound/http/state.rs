//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::PageBounds;

use crate::domain::SportRegistry;
use crate::domain::ports::{
    AuthService, EventsCommand, EventsQuery, FixtureAuthService, FixtureEventsCommand,
    FixtureEventsQuery,
};

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub events_query: Arc<dyn EventsQuery>,
    pub events_command: Arc<dyn EventsCommand>,
    pub auth: Arc<dyn AuthService>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            events_query: Arc::new(FixtureEventsQuery),
            events_command: Arc::new(FixtureEventsCommand),
            auth: Arc::new(FixtureAuthService),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events_query: Arc<dyn EventsQuery>,
    pub events_command: Arc<dyn EventsCommand>,
    pub auth: Arc<dyn AuthService>,
    pub sports: Arc<SportRegistry>,
    pub page_bounds: PageBounds,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the built-in sport catalogue and default page
    /// bounds.
    ///
    /// # Examples
    /// ```no_run
    /// use matchday::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// assert!(!state.sports.sports().is_empty());
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            events_query,
            events_command,
            auth,
        } = ports;
        Self {
            events_query,
            events_command,
            auth,
            sports: Arc::new(SportRegistry::builtin()),
            page_bounds: PageBounds::default(),
        }
    }

    /// Replace the sport catalogue served by `/sports`.
    #[must_use]
    pub fn with_sports(mut self, sports: Arc<SportRegistry>) -> Self {
        self.sports = sports;
        self
    }

    /// Replace the pagination bounds applied to list requests.
    #[must_use]
    pub fn with_page_bounds(mut self, bounds: PageBounds) -> Self {
        self.page_bounds = bounds;
        self
    }
}
