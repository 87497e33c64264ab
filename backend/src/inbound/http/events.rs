//! Event HTTP handlers.
//!
//! ```text
//! GET    /api/v1/events?search=run&sportType=running&dateFrom=2025-06-01&limit=10
//! GET    /api/v1/events/count
//! GET    /api/v1/events/{id}
//! POST   /api/v1/events
//! PATCH  /api/v1/events/{id}
//! DELETE /api/v1/events/{id}
//! ```
//!
//! Writes answer with an `Invalidate-Views` header listing the view paths
//! whose cached renderings are now stale.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CountEventsRequest, CreateEventRequest, DeleteEventRequest, GetEventRequest,
    ListEventsRequest, UpdateEventRequest, ViewPath,
};
use crate::domain::{Error, Event, EventDraft, EventFilters, EventPatch, EventSchedule};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DateBound, FieldName, parse_event_id, parse_optional_date_bound, parse_rfc3339_timestamp,
    resolve_page,
};

/// Response header naming the views a write made stale.
pub const INVALIDATE_VIEWS_HEADER: &str = "invalidate-views";

/// Event payload returned by every event endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    #[schema(example = "running")]
    pub sport_type: String,
    #[schema(format = "date-time")]
    pub date_time: String,
    pub description: Option<String>,
    pub venues: Vec<String>,
    #[schema(example = "green")]
    pub color: Option<String>,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<Event> for EventBody {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name,
            sport_type: event.sport_type,
            date_time: event.date_time.to_rfc3339(),
            description: event.description,
            venues: event.venues,
            color: event.color.map(|color| color.as_str().to_owned()),
            user_id: event.user_id.to_string(),
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
        }
    }
}

/// Count payload for `GET /api/v1/events/count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct EventCountBody {
    pub count: u64,
}

/// Request body for `POST /api/v1/events`.
///
/// The start time is either `dateTime` (RFC 3339) or the `date` plus `time`
/// pair, which is read as UTC. `dateTime` wins when both are sent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sport_type: String,
    #[schema(format = "date-time")]
    pub date_time: Option<String>,
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
    #[schema(example = "09:30")]
    pub time: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub venues: Vec<String>,
    pub color: Option<String>,
}

/// Request body for `PATCH /api/v1/events/{id}`.
///
/// Absent fields are left untouched. Sending `null` for `description` or
/// `color` clears the stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venues: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters shared by the list and count endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Case-insensitive substring of the event name.
    pub search: Option<String>,
    /// Sport id or display name; `all` disables the filter.
    pub sport_type: Option<String>,
    /// Inclusive lower bound (`YYYY-MM-DD` or RFC 3339).
    pub date_from: Option<String>,
    /// Inclusive upper bound; a bare date covers the whole day.
    pub date_to: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl EventListQuery {
    fn into_filters(self, state: &HttpState, paged: bool) -> Result<EventFilters, Error> {
        let date_from = parse_optional_date_bound(
            self.date_from.as_deref(),
            FieldName::new("dateFrom"),
            DateBound::Start,
        )?;
        let date_to = parse_optional_date_bound(
            self.date_to.as_deref(),
            FieldName::new("dateTo"),
            DateBound::End,
        )?;
        let page = if paged {
            resolve_page(self.limit, self.offset, state.page_bounds)?
        } else {
            None
        };
        Ok(EventFilters {
            search: self.search,
            sport_type: self.sport_type,
            date_from,
            date_to,
            page,
        })
    }
}

fn parse_schedule(
    date_time: Option<String>,
    date: Option<String>,
    time: Option<String>,
) -> Result<Option<EventSchedule>, Error> {
    if let Some(raw) = date_time.filter(|raw| !raw.trim().is_empty()) {
        let at = parse_rfc3339_timestamp(&raw, FieldName::new("dateTime"))?;
        return Ok(Some(EventSchedule::At(at)));
    }
    if date.is_none() && time.is_none() {
        return Ok(None);
    }
    Ok(Some(EventSchedule::Split {
        date: date.unwrap_or_default(),
        time: time.unwrap_or_default(),
    }))
}

impl TryFrom<CreateEventBody> for EventDraft {
    type Error = Error;

    fn try_from(body: CreateEventBody) -> Result<Self, Self::Error> {
        Ok(Self {
            schedule: parse_schedule(body.date_time, body.date, body.time)?,
            name: body.name,
            sport_type: body.sport_type,
            description: body.description,
            venues: body.venues,
            color: body.color,
        })
    }
}

impl TryFrom<UpdateEventBody> for EventPatch {
    type Error = Error;

    fn try_from(body: UpdateEventBody) -> Result<Self, Self::Error> {
        Ok(Self {
            schedule: parse_schedule(body.date_time, body.date, body.time)?,
            name: body.name,
            sport_type: body.sport_type,
            description: body.description,
            venues: body.venues,
            color: body.color,
        })
    }
}

fn invalidation_header(views: &[ViewPath]) -> (&'static str, String) {
    let joined = views
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    (INVALIDATE_VIEWS_HEADER, joined)
}

/// List the caller's events ordered by start time.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events", body = [EventBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security(("SessionCookie" = []))
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<EventListQuery>,
) -> ApiResult<web::Json<Vec<EventBody>>> {
    let filters = query.into_inner().into_filters(&state, true)?;
    let response = state
        .events_query
        .list_events(ListEventsRequest {
            session: session.handle()?,
            filters,
        })
        .await?;
    Ok(web::Json(
        response.events.into_iter().map(EventBody::from).collect(),
    ))
}

/// Count the caller's events matching the filters; paging is ignored.
#[utoipa::path(
    get,
    path = "/api/v1/events/count",
    params(EventListQuery),
    responses(
        (status = 200, description = "Matching event count", body = EventCountBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "countEvents",
    security(("SessionCookie" = []))
)]
#[get("/events/count")]
pub async fn count_events(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<EventListQuery>,
) -> ApiResult<web::Json<EventCountBody>> {
    let filters = query.into_inner().into_filters(&state, false)?;
    let response = state
        .events_query
        .count_events(CountEventsRequest {
            session: session.handle()?,
            filters,
        })
        .await?;
    Ok(web::Json(EventCountBody {
        count: response.count,
    }))
}

/// Fetch one of the caller's events.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, format = "uuid", description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security(("SessionCookie" = []))
)]
#[get("/events/{id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventBody>> {
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("id"))?;
    let response = state
        .events_query
        .get_event(GetEventRequest {
            session: session.handle()?,
            event_id,
        })
        .await?;
    Ok(web::Json(EventBody::from(response.event)))
}

/// Create an event owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Event created", body = EventBody,
            headers(("Invalidate-Views" = String, description = "Stale view paths"))),
        (status = 400, description = "Invalid request or event quota reached", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent",
    security(("SessionCookie" = []))
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEventBody>,
) -> ApiResult<HttpResponse> {
    let draft = EventDraft::try_from(payload.into_inner())?;
    let response = state
        .events_command
        .create_event(CreateEventRequest {
            session: session.handle()?,
            draft,
        })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header(invalidation_header(&response.invalidated))
        .json(EventBody::from(response.event)))
}

/// Apply a partial update to one of the caller's events.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, format = "uuid", description = "Event id")),
    request_body = UpdateEventBody,
    responses(
        (status = 200, description = "Event updated", body = EventBody,
            headers(("Invalidate-Views" = String, description = "Stale view paths"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "updateEvent",
    security(("SessionCookie" = []))
)]
#[patch("/events/{id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateEventBody>,
) -> ApiResult<HttpResponse> {
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("id"))?;
    let patch = EventPatch::try_from(payload.into_inner())?;
    let response = state
        .events_command
        .update_event(UpdateEventRequest {
            session: session.handle()?,
            event_id,
            patch,
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(invalidation_header(&response.invalidated))
        .json(EventBody::from(response.event)))
}

/// Delete one of the caller's events. Unknown ids succeed.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, format = "uuid", description = "Event id")),
    responses(
        (status = 204, description = "Event deleted",
            headers(("Invalidate-Views" = String, description = "Stale view paths"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent",
    security(("SessionCookie" = []))
)]
#[delete("/events/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event_id = parse_event_id(&path.into_inner(), FieldName::new("id"))?;
    let response = state
        .events_command
        .delete_event(DeleteEventRequest {
            session: session.handle()?,
            event_id,
        })
        .await?;
    Ok(HttpResponse::NoContent()
        .insert_header(invalidation_header(&response.invalidated))
        .finish())
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
