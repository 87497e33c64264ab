//! Tests for event HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    AuthService, CountEventsResponse, CreateEventResponse, DeleteEventResponse, EventsCommand,
    EventsQuery, GetEventResponse, ListEventsResponse, MockAuthService, MockEventsCommand,
    MockEventsQuery, UpdateEventResponse,
};
use crate::domain::{
    AccessToken, AuthSession, EmailAddress, EventColor, EventId, Identity, UserId,
};
use crate::inbound::http::auth::login;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

const TOKEN: &str = "runner-token";
const EVENT_ID: &str = "00000000-0000-0000-0000-000000000501";

fn owner() -> UserId {
    UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id")
}

fn sample_event() -> Event {
    let at = Utc
        .with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
        .single()
        .expect("timestamp");
    Event {
        id: EVENT_ID.parse().expect("event id"),
        name: "5k Run".to_owned(),
        sport_type: "running".to_owned(),
        date_time: at,
        description: None,
        venues: vec!["Park".to_owned()],
        color: Some(EventColor::Green),
        user_id: owner(),
        created_at: at,
        updated_at: at,
    }
}

fn auth() -> Arc<dyn AuthService> {
    let mut auth = MockAuthService::new();
    auth.expect_sign_in().returning(|_| {
        Ok(AuthSession {
            access_token: AccessToken::new(TOKEN).expect("token"),
            identity: Identity {
                id: owner(),
                email: EmailAddress::new("runner@example.com").expect("email"),
                created_at: Utc::now(),
            },
        })
    });
    Arc::new(auth)
}

fn carries_token(session: &crate::domain::SessionHandle) -> bool {
    session
        .access_token()
        .is_some_and(|token| token.expose() == TOKEN)
}

fn test_app(
    events_query: Arc<dyn EventsQuery>,
    events_command: Arc<dyn EventsCommand>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(HttpStatePorts {
        events_query,
        events_command,
        auth: auth(),
    });
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(list_events)
                .service(count_events)
                .service(get_event)
                .service(create_event)
                .service(update_event)
                .service(delete_event),
        )
}

async fn login_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "runner@example.com", "password": "secret"}))
        .to_request();
    let login_res = actix_test::call_service(app, login_req).await;
    assert!(login_res.status().is_success());
    session_cookie(&login_res)
}

fn header_value<B>(response: &actix_web::dev::ServiceResponse<B>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[actix_web::test]
async fn list_forwards_filters_and_serialises_camel_case() {
    let mut query = MockEventsQuery::new();
    query
        .expect_list_events()
        .withf(|request| {
            let filters = &request.filters;
            carries_token(&request.session)
                && filters.search.as_deref() == Some("run")
                && filters.sport_type.as_deref() == Some("running")
                && filters.date_from
                    == Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single()
                && filters.date_to.is_some_and(|to| {
                    to > Utc
                        .with_ymd_and_hms(2025, 6, 30, 23, 59, 59)
                        .single()
                        .expect("timestamp")
                })
                && filters
                    .page
                    .is_some_and(|page| page.limit() == 5 && page.offset() == 10)
        })
        .times(1)
        .returning(|_| {
            Ok(ListEventsResponse {
                events: vec![sample_event()],
            })
        });
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events?search=run&sportType=running&dateFrom=2025-06-01&dateTo=2025-06-30&limit=5&offset=10")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let first = &body[0];
    assert_eq!(first["id"], EVENT_ID);
    assert_eq!(first["sportType"], "running");
    assert_eq!(first["dateTime"], "2025-06-01T09:30:00+00:00");
    assert_eq!(first["color"], "green");
    assert_eq!(first["venues"], json!(["Park"]));
}

#[actix_web::test]
async fn anonymous_callers_reach_the_port_without_a_token() {
    let mut query = MockEventsQuery::new();
    query
        .expect_list_events()
        .withf(|request| request.session.access_token().is_none())
        .times(1)
        .returning(|_| Err(Error::unauthorized("Not authenticated")));
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/events").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case("/api/v1/events?dateFrom=yesterday", "dateFrom")]
#[case("/api/v1/events?dateTo=2025-02-30", "dateTo")]
#[case("/api/v1/events?limit=0", "limit")]
#[case("/api/v1/events?limit=500", "limit")]
#[actix_web::test]
async fn malformed_list_queries_never_reach_the_port(#[case] uri: &str, #[case] field: &str) {
    let mut query = MockEventsQuery::new();
    query.expect_list_events().times(0);
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn count_ignores_paging() {
    let mut query = MockEventsQuery::new();
    query
        .expect_count_events()
        .withf(|request| request.filters.page.is_none() && carries_token(&request.session))
        .times(1)
        .returning(|_| Ok(CountEventsResponse { count: 3 }));
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events/count?limit=2&offset=2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"count": 3}));
}

#[actix_web::test]
async fn get_rejects_malformed_ids() {
    let mut query = MockEventsQuery::new();
    query.expect_get_event().times(0);
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/events/not-a-uuid")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_events_are_not_found() {
    let mut query = MockEventsQuery::new();
    query
        .expect_get_event()
        .withf(|request| request.event_id.to_string() == EVENT_ID)
        .times(1)
        .returning(|_| Err(Error::not_found("Event not found")));
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/events/{EVENT_ID}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn get_returns_the_event() {
    let mut query = MockEventsQuery::new();
    query.expect_get_event().times(1).returning(|_| {
        Ok(GetEventResponse {
            event: sample_event(),
        })
    });
    let app = actix_test::init_service(test_app(
        Arc::new(query),
        Arc::new(MockEventsCommand::new()),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/events/{EVENT_ID}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["name"], "5k Run");
}

#[actix_web::test]
async fn create_returns_created_with_invalidated_views() {
    let mut command = MockEventsCommand::new();
    command
        .expect_create_event()
        .withf(|request| {
            let draft = &request.draft;
            carries_token(&request.session)
                && draft.name == "5k Run"
                && draft.sport_type == "Running"
                && draft.venues == vec!["Park".to_owned()]
                && draft.schedule
                    == Some(EventSchedule::Split {
                        date: "2025-06-01".to_owned(),
                        time: "09:30".to_owned(),
                    })
        })
        .times(1)
        .returning(|_| {
            Ok(CreateEventResponse {
                event: sample_event(),
                invalidated: vec![ViewPath::Dashboard],
            })
        });
    let app = actix_test::init_service(test_app(
        Arc::new(MockEventsQuery::new()),
        Arc::new(command),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .cookie(cookie)
            .set_json(json!({
                "name": "5k Run",
                "sportType": "Running",
                "date": "2025-06-01",
                "time": "09:30",
                "venues": ["Park"]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        header_value(&res, INVALIDATE_VIEWS_HEADER).as_deref(),
        Some("/dashboard")
    );
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], EVENT_ID);
}

#[actix_web::test]
async fn create_rejects_malformed_date_time() {
    let mut command = MockEventsCommand::new();
    command.expect_create_event().times(0);
    let app = actix_test::init_service(test_app(
        Arc::new(MockEventsQuery::new()),
        Arc::new(command),
    ))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(json!({"name": "5k Run", "sportType": "running", "dateTime": "soon"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "dateTime");
}

#[actix_web::test]
async fn patch_distinguishes_null_from_absent() {
    let mut command = MockEventsCommand::new();
    command
        .expect_update_event()
        .withf(|request| {
            let patch = &request.patch;
            request.event_id.to_string() == EVENT_ID
                && patch.name.as_deref() == Some("10k Run")
                && patch.description == Some(None)
                && patch.color.is_none()
                && patch.venues.is_none()
                && patch.schedule.is_none()
        })
        .times(1)
        .returning(|request| {
            let mut event = sample_event();
            event.name = "10k Run".to_owned();
            Ok(UpdateEventResponse {
                event,
                invalidated: vec![ViewPath::Dashboard, ViewPath::EventEdit(request.event_id)],
            })
        });
    let app = actix_test::init_service(test_app(
        Arc::new(MockEventsQuery::new()),
        Arc::new(command),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/events/{EVENT_ID}"))
            .cookie(cookie)
            .set_json(json!({"name": "10k Run", "description": null}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        header_value(&res, INVALIDATE_VIEWS_HEADER),
        Some(format!("/dashboard, /events/{EVENT_ID}/edit"))
    );
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["name"], "10k Run");
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let mut command = MockEventsCommand::new();
    command
        .expect_delete_event()
        .withf(|request| carries_token(&request.session))
        .times(1)
        .returning(|_| {
            Ok(DeleteEventResponse {
                invalidated: vec![ViewPath::Dashboard],
            })
        });
    let app = actix_test::init_service(test_app(
        Arc::new(MockEventsQuery::new()),
        Arc::new(command),
    ))
    .await;
    let cookie = login_and_get_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/events/{}", EventId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        header_value(&res, INVALIDATE_VIEWS_HEADER).as_deref(),
        Some("/dashboard")
    );
}

#[rstest]
fn patch_body_without_fields_is_an_empty_patch() {
    let body: UpdateEventBody = serde_json::from_value(json!({})).expect("body");
    let patch = EventPatch::try_from(body).expect("patch");
    assert_eq!(patch, EventPatch::default());
}
