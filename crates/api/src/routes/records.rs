//! Generic record routes.
//!
//! One set of handlers serves all eight record resources; the adapter type
//! parameter picks the table pair, so `routes::<ProcessRepository>()` and
//! friends differ only in the path segment and the storage they touch.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::AppState;
use qms_core::record::{AccessScope, FileRef, NewRecord, RecordError, UpdateRecord};
use qms_core::storage::StorageService;
use qms_db::{RecordAdapter, UserRepository};

/// Request body for creating a record.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecordRequest {
    /// Target business area.
    #[validate(length(min = 1, message = "business_area is required"))]
    pub business_area: String,
    /// Record title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle status.
    #[serde(default = "default_status")]
    pub status: String,
    /// Entity-specific fields.
    #[serde(default = "default_details")]
    pub details: serde_json::Value,
}

fn default_status() -> String {
    "active".to_string()
}

fn default_details() -> serde_json::Value {
    json!({})
}

/// Request body for updating a record. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecordRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New entity-specific fields.
    pub details: Option<serde_json::Value>,
    /// Replacement file url; triggers a version snapshot when it differs
    /// from the current one.
    pub file_url: Option<String>,
    /// Replacement file name.
    pub file_name: Option<String>,
    /// Replacement file size in bytes.
    pub file_size: Option<i64>,
    /// Replacement file MIME type.
    pub file_type: Option<String>,
}

impl UpdateRecordRequest {
    fn into_update(self) -> UpdateRecord {
        let file = self.file_url.map(|url| FileRef {
            url,
            name: self.file_name,
            size: self.file_size,
            file_type: self.file_type,
        });
        UpdateRecord {
            title: self.title,
            description: self.description,
            status: self.status,
            details: self.details,
            file,
        }
    }
}

/// Request body for soft-deleting a record.
#[derive(Debug, Deserialize)]
pub struct SoftDeleteRequest {
    /// ID of the record to soft-delete.
    pub id: i64,
}

/// Creates the routes for one record resource.
pub fn routes<A: RecordAdapter>() -> Router<AppState> {
    let resource = A::KIND.resource();
    Router::new()
        .route(&format!("/{resource}"), post(create::<A>).get(list::<A>))
        .route(
            &format!("/{resource}/{{id}}"),
            get(get_record::<A>).put(update::<A>),
        )
        .route(&format!("/{resource}/soft-delete"), post(soft_delete::<A>))
        .route(&format!("/{resource}/{{id}}/file"), post(upload_file::<A>))
        .route(
            &format!("/{resource}/{{id}}/versions"),
            get(list_versions::<A>),
        )
}

/// POST /{resource} - Create a record.
async fn create<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRecordRequest>,
) -> Response {
    if let Err(e) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let input = NewRecord {
        business_area: payload.business_area,
        title: payload.title,
        description: payload.description,
        status: payload.status,
        details: payload.details,
        file: None,
    };

    let adapter = A::new((*state.db).clone());
    match adapter.create(input, auth.user_id(), &scope).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// GET /{resource} - List active records within the caller's scope.
async fn list<A: RecordAdapter>(State(state): State<AppState>, auth: AuthUser) -> Response {
    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    match adapter.list(&scope).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// GET /{resource}/{id} - Get one active record.
async fn get_record<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    match adapter.get(id, &scope).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// PUT /{resource}/{id} - Update a record.
async fn update<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Response {
    if let Some(title) = &payload.title
        && title.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "title must not be empty"
            })),
        )
            .into_response();
    }

    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    match adapter
        .update(id, payload.into_update(), auth.user_id(), &scope)
        .await
    {
        Ok(record) => Json(record).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// POST /{resource}/soft-delete - Soft-delete a record by ID.
async fn soft_delete<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SoftDeleteRequest>,
) -> Response {
    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    match adapter
        .soft_delete(payload.id, auth.user_id(), &scope, state.storage.clone())
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// POST /{resource}/{id}/file - Upload or replace the record's attachment.
///
/// Replacing an existing attachment snapshots the outgoing file into the
/// version-history table and bumps the version label.
async fn upload_file<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Response {
    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    let current = match adapter.get(id, &scope).await {
        Ok(record) => record,
        Err(e) => return record_error_response(&e),
    };

    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "missing_file",
                    "message": "A multipart file field is required"
                })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_multipart",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let file_name = field.file_name().map(str::to_owned);
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = match field.bytes().await {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_multipart",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };
    let size = i64::try_from(data.len()).unwrap_or(i64::MAX);

    if let Err(e) = state.storage.validate_upload(&content_type, data.len() as u64) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_file",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let key = StorageService::generate_object_key(
        &current.business_area,
        A::KIND.resource(),
        file_name.as_deref().unwrap_or("upload.bin"),
    );

    if let Err(e) = state.storage.upload(&key, data, &content_type).await {
        error!(error = %e, key = %key, "File upload failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "upload_failed",
                "message": "Could not store the uploaded file"
            })),
        )
            .into_response();
    }

    let input = UpdateRecord {
        file: Some(FileRef {
            url: key,
            name: file_name,
            size: Some(size),
            file_type: Some(content_type),
        }),
        ..Default::default()
    };

    match adapter.update(id, input, auth.user_id(), &scope).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// GET /{resource}/{id}/versions - List the record's file version history.
async fn list_versions<A: RecordAdapter>(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Response {
    let scope = match resolve_scope(&state, auth.user_id()).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    let adapter = A::new((*state.db).clone());
    match adapter.list_versions(id, &scope).await {
        Ok(versions) => Json(versions).into_response(),
        Err(e) => record_error_response(&e),
    }
}

/// Resolves the caller's access scope from the database.
///
/// An empty scope means the user row is gone; the token is rejected rather
/// than treated as a filter matching nothing.
async fn resolve_scope(state: &AppState, user_id: i64) -> Result<AccessScope, Response> {
    let repo = UserRepository::new((*state.db).clone());
    match repo.accessible_business_areas(user_id).await {
        Ok(scope) => {
            if scope.is_empty() {
                Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "User account no longer exists"
                    })),
                )
                    .into_response())
            } else {
                Ok(scope)
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to resolve access scope");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response())
        }
    }
}

/// Maps a record error to an HTTP response.
fn record_error_response(e: &RecordError) -> Response {
    match e {
        RecordError::NotFoundOrForbidden => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Record not found"
            })),
        )
            .into_response(),
        RecordError::Forbidden(msg) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": msg
            })),
        )
            .into_response(),
        RecordError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": msg
            })),
        )
            .into_response(),
        RecordError::Repository(msg) => {
            error!(error = %msg, "Repository error");
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
    use rstest::rstest;

    #[test]
    fn test_create_request_defaults() {
        let payload: CreateRecordRequest = serde_json::from_str(
            r#"{"business_area": "Finance", "title": "Invoice approval process"}"#,
        )
        .unwrap();

        assert_eq!(payload.status, "active");
        assert_eq!(payload.details, json!({}));
        assert!(payload.description.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_empty_title() {
        let payload: CreateRecordRequest =
            serde_json::from_str(r#"{"business_area": "Finance", "title": ""}"#).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_request_builds_file_ref_only_with_url() {
        let without_url: UpdateRecordRequest =
            serde_json::from_str(r#"{"file_name": "a.pdf"}"#).unwrap();
        assert!(without_url.into_update().file.is_none());

        let with_url: UpdateRecordRequest = serde_json::from_str(
            r#"{"file_url": "finance/processes/x_a.pdf", "file_name": "a.pdf", "file_size": 42}"#,
        )
        .unwrap();
        let update = with_url.into_update();
        let file = update.file.expect("url present");
        assert_eq!(file.url, "finance/processes/x_a.pdf");
        assert_eq!(file.name.as_deref(), Some("a.pdf"));
        assert_eq!(file.size, Some(42));
    }

    #[rstest]
    #[case(RecordError::NotFoundOrForbidden, StatusCode::NOT_FOUND)]
    #[case(RecordError::forbidden("no access"), StatusCode::FORBIDDEN)]
    #[case(RecordError::validation("bad input"), StatusCode::BAD_REQUEST)]
    #[case(RecordError::repository("db down"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_record_error_status_codes(#[case] error: RecordError, #[case] expected: StatusCode) {
        assert_eq!(record_error_response(&error).status(), expected);
    }
}
