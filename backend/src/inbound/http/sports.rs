//! Sport catalogue HTTP handler.
//!
//! ```text
//! GET /api/v1/sports
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Sport;
use crate::inbound::http::state::HttpState;

/// One selectable sport.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SportBody {
    #[schema(example = "running")]
    pub id: String,
    #[schema(example = "Running")]
    pub name: String,
    pub emoji: String,
    #[schema(example = "individual")]
    pub category: String,
}

impl From<&Sport> for SportBody {
    fn from(sport: &Sport) -> Self {
        Self {
            id: sport.id.clone(),
            name: sport.name.clone(),
            emoji: sport.emoji.clone(),
            category: sport.category.as_str().to_owned(),
        }
    }
}

/// Sports accepted by the event endpoints, built-ins first.
#[utoipa::path(
    get,
    path = "/api/v1/sports",
    responses((status = 200, description = "Sport catalogue", body = [SportBody])),
    tags = ["sports"],
    operation_id = "listSports",
    security([])
)]
#[get("/sports")]
pub async fn list_sports(state: web::Data<HttpState>) -> web::Json<Vec<SportBody>> {
    web::Json(state.sports.sports().iter().map(SportBody::from).collect())
}
