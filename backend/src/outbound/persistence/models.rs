//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::events;

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub sport_type: String,
    pub date_time: DateTime<Utc>,
    pub description: Option<String>,
    pub venues: Vec<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub sport_type: &'a str,
    pub date_time: DateTime<Utc>,
    pub description: Option<&'a str>,
    pub venues: &'a [String],
    pub color: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial updates.
///
/// `None` skips a column; for nullable columns `Some(None)` writes `NULL`.
/// `updated_at` is always written, so the changeset is never empty.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventChangeset<'a> {
    pub name: Option<&'a str>,
    pub sport_type: Option<&'a str>,
    pub date_time: Option<DateTime<Utc>>,
    pub description: Option<Option<&'a str>>,
    pub venues: Option<&'a [String]>,
    pub color: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}
