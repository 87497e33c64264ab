//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! Every statement is filtered on `user_id`, so rows owned by another
//! identity behave exactly like missing rows.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{
    Event, EventColor, EventFilters, EventId, UserId, ValidatedEvent, ValidatedPatch,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EventChangeset, EventRow, NewEventRow};
use super::pool::DbPool;
use super::schema::events;

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselEventRepository {
    /// Create a repository that stamps rows with the wall clock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(mockable::DefaultClock))
    }

    /// Create a repository with an explicit clock.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Escape `ILIKE` metacharacters so search terms match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Scope a boxed query to one owner and the non-paging filters.
fn apply_filters<'a, ST: 'a>(
    query: events::BoxedQuery<'a, Pg, ST>,
    owner: Uuid,
    filters: &EventFilters,
) -> events::BoxedQuery<'a, Pg, ST> {
    let mut query = query.filter(events::user_id.eq(owner));
    if let Some(term) = filters.search.as_deref() {
        query = query.filter(events::name.ilike(escape_like(term)));
    }
    if let Some(sport) = filters.sport_type.clone() {
        query = query.filter(events::sport_type.eq(sport));
    }
    if let Some(from) = filters.date_from {
        query = query.filter(events::date_time.ge(from));
    }
    if let Some(to) = filters.date_to {
        query = query.filter(events::date_time.le(to));
    }
    query
}

/// Convert a database row into a domain event.
fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    let EventRow {
        id,
        user_id,
        name,
        sport_type,
        date_time,
        description,
        venues,
        color,
        created_at,
        updated_at,
    } = row;

    let color = color
        .map(|raw| raw.parse::<EventColor>())
        .transpose()
        .map_err(|err| EventRepositoryError::query(err.to_string()))?;

    Ok(Event {
        id: EventId::from_uuid(id),
        name,
        sport_type,
        date_time,
        description,
        venues,
        color,
        user_id: UserId::from_uuid(user_id),
        created_at,
        updated_at,
    })
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_all(
        &self,
        owner: &UserId,
        filters: &EventFilters,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = apply_filters(
            events::table.select(EventRow::as_select()).into_boxed(),
            *owner.as_uuid(),
            filters,
        )
        .order((events::date_time.asc(), events::id.asc()));
        if let Some(window) = filters.page {
            query = query
                .limit(i64::from(window.limit()))
                .offset(i64::from(window.offset()));
        }

        let rows: Vec<EventRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_event).collect()
    }

    async fn count(
        &self,
        owner: &UserId,
        filters: &EventFilters,
    ) -> Result<u64, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = apply_filters(
            events::table.select(diesel::dsl::count_star()).into_boxed(),
            *owner.as_uuid(),
            filters,
        )
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        u64::try_from(total).map_err(|err| EventRepositoryError::query(err.to_string()))
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &EventId,
    ) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = events::table
            .filter(events::id.eq(id.as_uuid()))
            .filter(events::user_id.eq(owner.as_uuid()))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map_or_else(
            || Err(EventRepositoryError::not_found(*id)),
            row_to_event,
        )
    }

    async fn insert(
        &self,
        owner: &UserId,
        record: &ValidatedEvent,
    ) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();

        let new_row = NewEventRow {
            id: *EventId::random().as_uuid(),
            user_id: *owner.as_uuid(),
            name: record.name(),
            sport_type: record.sport_type(),
            date_time: record.date_time(),
            description: record.description(),
            venues: record.venues(),
            color: record.color().map(EventColor::as_str),
            created_at: now,
            updated_at: now,
        };

        let row = diesel::insert_into(events::table)
            .values(&new_row)
            .returning(EventRow::as_returning())
            .get_result::<EventRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_event(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: &ValidatedPatch,
    ) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = EventChangeset {
            name: patch.name(),
            sport_type: patch.sport_type(),
            date_time: patch.date_time(),
            description: patch.description(),
            venues: patch.venues(),
            color: patch
                .color()
                .map(|color| color.map(EventColor::as_str)),
            updated_at: self.clock.utc(),
        };

        let row = diesel::update(
            events::table
                .filter(events::id.eq(id.as_uuid()))
                .filter(events::user_id.eq(owner.as_uuid())),
        )
        .set(&changeset)
        .returning(EventRow::as_returning())
        .get_result::<EventRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map_or_else(
            || Err(EventRepositoryError::not_found(*id)),
            row_to_event,
        )
    }

    async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            events::table
                .filter(events::id.eq(id.as_uuid()))
                .filter(events::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }
}
