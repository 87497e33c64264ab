//! Sports event domain types.
//!
//! Events are owned by exactly one identity. Callers submit an
//! [`EventDraft`] or [`EventPatch`]; the [`EventValidator`] normalises it
//! into a [`ValidatedEvent`] or [`ValidatedPatch`] before anything reaches
//! storage.

use std::fmt;

use serde_json::json;

use super::Error;

mod event;
mod filters;
mod sports;
mod validation;

pub use event::{Event, EventColor, EventId, ParseEventColorError};
pub use filters::{ALL_SPORTS, EventFilters};
pub use sports::{Sport, SportCategory, SportRegistry, SportSpecError};
pub use validation::{
    EventDraft, EventLimits, EventPatch, EventSchedule, EventValidator, ValidatedEvent,
    ValidatedPatch,
};

/// Validation errors raised while normalising event input.
///
/// Only the first violation is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Name is blank after trimming.
    NameRequired,
    /// Name exceeds `max` characters.
    NameTooLong { max: usize },
    /// Sport is not in the registry.
    InvalidSport,
    /// Neither `dateTime` nor `date` + `time` was supplied.
    DateTimeRequired,
    /// A time was supplied without a date.
    DateRequired,
    /// A date was supplied without a time.
    TimeRequired,
    /// Date is not `YYYY-MM-DD`.
    InvalidDate,
    /// Time is not `HH:MM` or `HH:MM:SS`.
    InvalidTime,
    /// Description exceeds `max` characters.
    DescriptionTooLong { max: usize },
    /// No non-blank venue remains.
    VenuesRequired,
    /// More than `max` venues after filtering.
    TooManyVenues { max: usize },
    /// Colour is not one of the palette names.
    InvalidColor,
    /// The owner already holds the maximum number of events.
    QuotaExceeded { max: u64 },
}

impl EventValidationError {
    /// Request field the violation refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTooLong { .. } => "name",
            Self::InvalidSport => "sportType",
            Self::DateTimeRequired => "dateTime",
            Self::DateRequired | Self::InvalidDate => "date",
            Self::TimeRequired | Self::InvalidTime => "time",
            Self::DescriptionTooLong { .. } => "description",
            Self::VenuesRequired | Self::TooManyVenues { .. } => "venues",
            Self::InvalidColor => "color",
            Self::QuotaExceeded { .. } => "events",
        }
    }
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameRequired => write!(f, "Event name is required"),
            Self::NameTooLong { .. } => write!(f, "Event name is too long"),
            Self::InvalidSport => write!(f, "Please select a valid sport type"),
            Self::DateTimeRequired | Self::DateRequired => write!(f, "Please select a date"),
            Self::TimeRequired => write!(f, "Please select a time"),
            Self::InvalidDate => write!(f, "Please enter a valid date"),
            Self::InvalidTime => write!(f, "Please enter a valid time"),
            Self::DescriptionTooLong { .. } => write!(f, "Description is too long"),
            Self::VenuesRequired => write!(f, "At least one venue is required"),
            Self::TooManyVenues { max } => write!(f, "Maximum {max} venues allowed"),
            Self::InvalidColor => write!(f, "Please select a valid color"),
            Self::QuotaExceeded { max } => write!(f, "Maximum {max} events allowed"),
        }
    }
}

impl std::error::Error for EventValidationError {}

impl From<EventValidationError> for Error {
    fn from(value: EventValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": "validation_failed",
        }))
    }
}
