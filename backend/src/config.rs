//! Service configuration loaded via OrthoConfig.
//!
//! Every value can be supplied as a `MATCHDAY_*` environment variable, a
//! command-line flag, or a configuration file key. Optional values fall back
//! to the defaults exposed by the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageBounds};
use serde::Deserialize;
use url::Url;

use crate::domain::{
    DEFAULT_MAX_EVENTS_PER_USER, EventLimits, SportRegistry, SportSpecError,
};
use crate::outbound::identity::IdentityProviderSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SITE_URL: &str = "http://localhost:8080";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid {name} `{value}`: {source}")]
    Url {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("MATCHDAY_IDENTITY_API_KEY is required when MATCHDAY_IDENTITY_URL is set")]
    MissingApiKey,
    #[error("invalid extra sport: {0}")]
    Sport(#[from] SportSpecError),
}

/// Runtime settings for the matchday service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MATCHDAY")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// Skip embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// Identity provider project URL; the in-memory directory is used when
    /// absent.
    pub identity_url: Option<String>,
    pub identity_api_key: Option<String>,
    pub identity_timeout_secs: Option<u64>,
    /// Public URL of this deployment, used for OAuth and sign-up redirects.
    pub site_url: Option<String>,
    pub max_events_per_user: Option<u64>,
    pub max_name_length: Option<usize>,
    pub max_description_length: Option<usize>,
    pub max_venues: Option<usize>,
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
    /// `id` or `id=Name` entries appended to the sport list; the
    /// environment form is comma-separated.
    pub extra_sports: Option<Vec<String>>,
}

impl AppSettings {
    /// Listen address, `0.0.0.0:8080` when unset.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Upper bound on pooled database connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Per-owner event quota.
    pub fn max_events_per_user(&self) -> u64 {
        self.max_events_per_user
            .unwrap_or(DEFAULT_MAX_EVENTS_PER_USER)
    }

    /// Default and maximum page sizes for list endpoints.
    pub fn page_bounds(&self) -> PageBounds {
        PageBounds::new(
            self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.max_page_size.unwrap_or(MAX_PAGE_SIZE),
        )
    }

    /// Field limits applied by the event validator.
    pub fn event_limits(&self) -> EventLimits {
        let defaults = EventLimits::default();
        EventLimits {
            max_name_length: self.max_name_length.unwrap_or(defaults.max_name_length),
            max_description_length: self
                .max_description_length
                .unwrap_or(defaults.max_description_length),
            max_venues: self.max_venues.unwrap_or(defaults.max_venues),
        }
    }

    /// Built-in sports plus any configured extras.
    pub fn sport_registry(&self) -> Result<SportRegistry, SettingsError> {
        let extras = self
            .extra_sports
            .iter()
            .flatten()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty());
        Ok(SportRegistry::from_specs(extras)?)
    }

    /// Public URL of this deployment.
    pub fn site_url(&self) -> Result<Url, SettingsError> {
        parse_url("MATCHDAY_SITE_URL", self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL))
    }

    /// Identity provider connection settings, or `None` when no provider
    /// URL is configured.
    pub fn identity_settings(&self) -> Result<Option<IdentityProviderSettings>, SettingsError> {
        let Some(raw) = self.identity_url.as_deref() else {
            return Ok(None);
        };
        let api_key = self
            .identity_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingApiKey)?;
        Ok(Some(IdentityProviderSettings {
            base_url: parse_url("MATCHDAY_IDENTITY_URL", raw)?,
            api_key,
            site_url: self.site_url()?,
            timeout: Duration::from_secs(
                self.identity_timeout_secs
                    .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
            ),
        }))
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Url {
        name,
        value: value.to_owned(),
        source,
    })
}
