//! Business area routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use qms_db::BusinessAreaRepository;

/// Business area response.
#[derive(Serialize)]
pub struct BusinessAreaResponse {
    /// Business area ID.
    pub id: i64,
    /// Business area name.
    pub name: String,
}

/// Creates the business area routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/business-areas", get(list))
}

/// GET /business-areas - List all business areas.
async fn list(State(state): State<AppState>) -> impl IntoResponse {
    let repo = BusinessAreaRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(areas) => Json(
            areas
                .into_iter()
                .map(|a| BusinessAreaResponse {
                    id: a.id,
                    name: a.name,
                })
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list business areas");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
