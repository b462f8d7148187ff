//! Audit trail routes.
//!
//! Read-only: the trail is append-only and entries are written exclusively
//! by the soft-delete path.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use qms_db::AuditLogRepository;

/// Query parameters for listing audit entries.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Restrict to deletions from one record table.
    pub table_name: Option<String>,
    /// Maximum number of entries to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    100
}

/// Creates the audit trail routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit", get(list))
}

/// GET /audit - List deletion audit entries, most recent first.
async fn list(State(state): State<AppState>, Query(query): Query<AuditQuery>) -> impl IntoResponse {
    let repo = AuditLogRepository::new((*state.db).clone());
    let limit = query.limit.min(1000);

    match repo.list(query.table_name.as_deref(), limit).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list audit entries");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_query_defaults() {
        let query: AuditQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 100);
        assert!(query.table_name.is_none());
    }

    #[test]
    fn test_audit_query_with_table() {
        let query: AuditQuery =
            serde_json::from_str(r#"{"table_name": "processes", "limit": 10}"#).unwrap();
        assert_eq!(query.table_name.as_deref(), Some("processes"));
        assert_eq!(query.limit, 10);
    }
}
