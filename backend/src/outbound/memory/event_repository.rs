//! In-memory `EventRepository` used when no database is configured.
//!
//! Mirrors the Diesel adapter's semantics: owner scoping, inclusive date
//! bounds, `(date_time, id)` ordering and limit/offset paging.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventFilters, EventId, UserId, ValidatedEvent, ValidatedPatch};

/// Process-local event store.
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<EventId, Event>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new(Arc::new(mockable::DefaultClock))
    }
}

impl InMemoryEventRepository {
    /// Empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, HashMap<EventId, Event>>, EventRepositoryError> {
        self.events
            .lock()
            .map_err(|_| EventRepositoryError::connection("in-memory event store lock poisoned"))
    }

    fn owned<'a>(
        store: &'a HashMap<EventId, Event>,
        owner: &'a UserId,
        filters: &'a EventFilters,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        store
            .values()
            .filter(move |event| event.user_id == *owner && filters.matches(event))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_all(
        &self,
        owner: &UserId,
        filters: &EventFilters,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let store = self.store()?;
        let mut events: Vec<Event> = Self::owned(&store, owner, filters).cloned().collect();
        events.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));

        let Some(window) = filters.page else {
            return Ok(events);
        };
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        Ok(events.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(
        &self,
        owner: &UserId,
        filters: &EventFilters,
    ) -> Result<u64, EventRepositoryError> {
        let store = self.store()?;
        let total = Self::owned(&store, owner, filters).count();
        u64::try_from(total).map_err(|err| EventRepositoryError::query(err.to_string()))
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &EventId,
    ) -> Result<Event, EventRepositoryError> {
        self.store()?
            .get(id)
            .filter(|event| event.user_id == *owner)
            .cloned()
            .ok_or_else(|| EventRepositoryError::not_found(*id))
    }

    async fn insert(
        &self,
        owner: &UserId,
        record: &ValidatedEvent,
    ) -> Result<Event, EventRepositoryError> {
        let now = self.clock.utc();
        let event = Event {
            id: EventId::random(),
            name: record.name().to_owned(),
            sport_type: record.sport_type().to_owned(),
            date_time: record.date_time(),
            description: record.description().map(str::to_owned),
            venues: record.venues().to_vec(),
            color: record.color(),
            user_id: *owner,
            created_at: now,
            updated_at: now,
        };
        self.store()?.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EventId,
        patch: &ValidatedPatch,
    ) -> Result<Event, EventRepositoryError> {
        let now = self.clock.utc();
        let mut store = self.store()?;
        let event = store
            .get_mut(id)
            .filter(|event| event.user_id == *owner)
            .ok_or_else(|| EventRepositoryError::not_found(*id))?;
        patch.apply_to(event);
        event.updated_at = now;
        Ok(event.clone())
    }

    async fn delete(&self, owner: &UserId, id: &EventId) -> Result<(), EventRepositoryError> {
        let mut store = self.store()?;
        if store.get(id).is_some_and(|event| event.user_id == *owner) {
            store.remove(id);
        }
        Ok(())
    }
}
