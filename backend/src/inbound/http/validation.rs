//! Shared parsing helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with `details.field` naming the
//! JSON or query field, so clients can highlight the offending input.

use actix_web::web;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use pagination::{PageBounds, PageError, PageRequest, PageWindow};
use serde_json::json;

use crate::domain::{Error, EventId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Which end of an inclusive date range a bare date anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateBound {
    /// Midnight at the start of the day.
    Start,
    /// Last representable instant of the day.
    End,
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_event_id(value: &str, field: FieldName) -> Result<EventId, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

fn invalid_timestamp(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        format!("{} must be an RFC 3339 timestamp", field.as_str()),
        ErrorCode::InvalidTimestamp,
        value,
    )
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp(field, value))
}

/// Parse a range bound given as an RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date.
pub(crate) fn parse_date_bound(
    value: &str,
    field: FieldName,
    bound: DateBound,
) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            format!(
                "{} must be a YYYY-MM-DD date or an RFC 3339 timestamp",
                field.as_str()
            ),
            ErrorCode::InvalidTimestamp,
            value,
        )
    })?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| invalid_timestamp(field, value))?,
    };
    Ok(date.and_time(time).and_utc())
}

pub(crate) fn parse_optional_date_bound(
    value: Option<&str>,
    field: FieldName,
    bound: DateBound,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date_bound(raw, field, bound))
        .transpose()
}

pub(crate) fn resolve_page(
    limit: Option<u32>,
    offset: Option<u32>,
    bounds: PageBounds,
) -> Result<Option<PageWindow>, Error> {
    PageRequest::new(limit, offset)
        .resolve(bounds)
        .map_err(|err: PageError| {
            let value = limit.map(|raw| raw.to_string()).unwrap_or_default();
            field_error(FieldName::new("limit"), err.to_string(), ErrorCode::InvalidPage, &value)
        })
}

/// JSON extractor settings that report malformed bodies as
/// `invalid_request` instead of actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}

/// Query-string extractor settings matching [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    })
}
