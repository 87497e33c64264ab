//! Event input normalisation.
//!
//! The validator is pure: no I/O and no clock. Validating the draft derived
//! from a [`ValidatedEvent`] yields an equal record.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::{Event, EventColor, EventValidationError, SportRegistry};

/// Length and count bounds applied to event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLimits {
    pub max_name_length: usize,
    pub max_description_length: usize,
    pub max_venues: usize,
}

impl Default for EventLimits {
    fn default() -> Self {
        Self {
            max_name_length: 255,
            max_description_length: 2000,
            max_venues: 10,
        }
    }
}

/// When an event takes place, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSchedule {
    /// A single absolute timestamp.
    At(DateTime<Utc>),
    /// Separate `YYYY-MM-DD` date and `HH:MM` time, interpreted as UTC.
    Split { date: String, time: String },
}

/// Unvalidated event fields for a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub sport_type: String,
    pub schedule: Option<EventSchedule>,
    pub description: Option<String>,
    pub venues: Vec<String>,
    pub color: Option<String>,
}

/// Unvalidated partial update. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub schedule: Option<EventSchedule>,
    pub description: Option<Option<String>>,
    pub venues: Option<Vec<String>>,
    pub color: Option<Option<String>>,
}

/// Normalised event fields ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    name: String,
    sport_type: String,
    date_time: DateTime<Utc>,
    description: Option<String>,
    venues: Vec<String>,
    color: Option<EventColor>,
}

impl ValidatedEvent {
    /// Trimmed, non-empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical sport registry id.
    pub fn sport_type(&self) -> &str {
        &self.sport_type
    }

    /// Start time in UTC.
    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    /// Trimmed description; blank input becomes `None`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Trimmed venues with blanks removed; never empty.
    pub fn venues(&self) -> &[String] {
        &self.venues
    }

    /// Optional highlight colour.
    pub fn color(&self) -> Option<EventColor> {
        self.color
    }
}

impl From<ValidatedEvent> for EventDraft {
    fn from(value: ValidatedEvent) -> Self {
        Self {
            name: value.name,
            sport_type: value.sport_type,
            schedule: Some(EventSchedule::At(value.date_time)),
            description: value.description,
            venues: value.venues,
            color: value.color.map(|color| color.as_str().to_owned()),
        }
    }
}

/// Normalised partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPatch {
    name: Option<String>,
    sport_type: Option<String>,
    date_time: Option<DateTime<Utc>>,
    description: Option<Option<String>>,
    venues: Option<Vec<String>>,
    color: Option<Option<EventColor>>,
}

impl ValidatedPatch {
    /// Replacement name, if supplied.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replacement canonical sport id, if supplied.
    pub fn sport_type(&self) -> Option<&str> {
        self.sport_type.as_deref()
    }

    /// Replacement start time, if supplied.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        self.date_time
    }

    /// `Some(None)` clears the description.
    pub fn description(&self) -> Option<Option<&str>> {
        self.description.as_ref().map(Option::as_deref)
    }

    /// Replacement venue list, if supplied.
    pub fn venues(&self) -> Option<&[String]> {
        self.venues.as_deref()
    }

    /// `Some(None)` clears the colour.
    pub fn color(&self) -> Option<Option<EventColor>> {
        self.color
    }

    /// True when the patch changes no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sport_type.is_none()
            && self.date_time.is_none()
            && self.description.is_none()
            && self.venues.is_none()
            && self.color.is_none()
    }

    /// Copy every supplied field onto `event`. Timestamps are left alone.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name.clone_from(name);
        }
        if let Some(sport_type) = &self.sport_type {
            event.sport_type.clone_from(sport_type);
        }
        if let Some(date_time) = self.date_time {
            event.date_time = date_time;
        }
        if let Some(description) = &self.description {
            event.description.clone_from(description);
        }
        if let Some(venues) = &self.venues {
            event.venues.clone_from(venues);
        }
        if let Some(color) = self.color {
            event.color = color;
        }
    }
}

/// Validates and normalises event input against limits and the sport
/// registry.
#[derive(Debug, Clone)]
pub struct EventValidator {
    limits: EventLimits,
    sports: Arc<SportRegistry>,
}

impl Default for EventValidator {
    fn default() -> Self {
        Self::new(EventLimits::default(), Arc::new(SportRegistry::builtin()))
    }
}

impl EventValidator {
    /// Validator enforcing `limits` against the sports in `sports`.
    pub fn new(limits: EventLimits, sports: Arc<SportRegistry>) -> Self {
        Self { limits, sports }
    }

    /// Active length and count limits.
    pub fn limits(&self) -> EventLimits {
        self.limits
    }

    /// Sports accepted by this validator.
    pub fn sports(&self) -> &SportRegistry {
        &self.sports
    }

    /// Validate a create request. The first violation wins.
    ///
    /// # Examples
    /// ```
    /// use matchday::domain::{EventDraft, EventSchedule, EventValidator};
    ///
    /// let draft = EventDraft {
    ///     name: " 5k Run ".to_owned(),
    ///     sport_type: "Running".to_owned(),
    ///     schedule: Some(EventSchedule::Split {
    ///         date: "2025-06-01".to_owned(),
    ///         time: "09:00".to_owned(),
    ///     }),
    ///     venues: vec!["".to_owned(), "City Park".to_owned()],
    ///     ..EventDraft::default()
    /// };
    /// let event = EventValidator::default().validate(draft).unwrap();
    /// assert_eq!(event.name(), "5k Run");
    /// assert_eq!(event.sport_type(), "running");
    /// assert_eq!(event.venues(), ["City Park"]);
    /// assert_eq!(event.date_time().to_rfc3339(), "2025-06-01T09:00:00+00:00");
    /// ```
    pub fn validate(&self, draft: EventDraft) -> Result<ValidatedEvent, EventValidationError> {
        let name = self.name(&draft.name)?;
        let sport_type = self.sport(&draft.sport_type)?;
        let date_time = match draft.schedule {
            Some(schedule) => resolve_schedule(schedule)?,
            None => return Err(EventValidationError::DateTimeRequired),
        };
        let description = self.description(draft.description.as_deref())?;
        let venues = self.venues(draft.venues)?;
        let color = parse_color(draft.color.as_deref())?;
        Ok(ValidatedEvent {
            name,
            sport_type,
            date_time,
            description,
            venues,
            color,
        })
    }

    /// Validate each supplied field of a partial update with the same rules
    /// as [`EventValidator::validate`].
    pub fn validate_patch(&self, patch: EventPatch) -> Result<ValidatedPatch, EventValidationError> {
        let name = patch.name.as_deref().map(|name| self.name(name)).transpose()?;
        let sport_type = patch
            .sport_type
            .as_deref()
            .map(|sport| self.sport(sport))
            .transpose()?;
        let date_time = patch.schedule.map(resolve_schedule).transpose()?;
        let description = patch
            .description
            .map(|description| self.description(description.as_deref()))
            .transpose()?;
        let venues = patch.venues.map(|venues| self.venues(venues)).transpose()?;
        let color = patch
            .color
            .map(|color| parse_color(color.as_deref()))
            .transpose()?;
        Ok(ValidatedPatch {
            name,
            sport_type,
            date_time,
            description,
            venues,
            color,
        })
    }

    fn name(&self, raw: &str) -> Result<String, EventValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(EventValidationError::NameRequired);
        }
        if name.chars().count() > self.limits.max_name_length {
            return Err(EventValidationError::NameTooLong {
                max: self.limits.max_name_length,
            });
        }
        Ok(name.to_owned())
    }

    fn sport(&self, raw: &str) -> Result<String, EventValidationError> {
        self.sports
            .canonical_id(raw)
            .map(str::to_owned)
            .ok_or(EventValidationError::InvalidSport)
    }

    fn description(&self, raw: Option<&str>) -> Result<Option<String>, EventValidationError> {
        let Some(description) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if description.chars().count() > self.limits.max_description_length {
            return Err(EventValidationError::DescriptionTooLong {
                max: self.limits.max_description_length,
            });
        }
        Ok(Some(description.to_owned()))
    }

    fn venues(&self, raw: Vec<String>) -> Result<Vec<String>, EventValidationError> {
        let venues: Vec<String> = raw
            .iter()
            .map(|venue| venue.trim())
            .filter(|venue| !venue.is_empty())
            .map(str::to_owned)
            .collect();
        if venues.is_empty() {
            return Err(EventValidationError::VenuesRequired);
        }
        if venues.len() > self.limits.max_venues {
            return Err(EventValidationError::TooManyVenues {
                max: self.limits.max_venues,
            });
        }
        Ok(venues)
    }
}

fn resolve_schedule(schedule: EventSchedule) -> Result<DateTime<Utc>, EventValidationError> {
    match schedule {
        EventSchedule::At(date_time) => Ok(date_time),
        EventSchedule::Split { date, time } => merge_date_and_time(&date, &time),
    }
}

fn merge_date_and_time(date: &str, time: &str) -> Result<DateTime<Utc>, EventValidationError> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() {
        return Err(EventValidationError::DateRequired);
    }
    if time.is_empty() {
        return Err(EventValidationError::TimeRequired);
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| EventValidationError::InvalidDate)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| EventValidationError::InvalidTime)?;
    Ok(date.and_time(time).and_utc())
}

fn parse_color(raw: Option<&str>) -> Result<Option<EventColor>, EventValidationError> {
    match raw.map(str::trim).filter(|color| !color.is_empty()) {
        None => Ok(None),
        Some(color) => color
            .parse()
            .map(Some)
            .map_err(|_| EventValidationError::InvalidColor),
    }
}
