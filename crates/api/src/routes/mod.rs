//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};
use qms_db::{
    FeedbackSystemRepository, MonitoringControlRepository, ProcessRepository,
    QmsAssessmentRepository, QualityObjectiveRepository, RiskMatrixRepository,
    ThirdPartyEvaluationRepository, TrainingSessionRepository,
};

pub mod audit;
pub mod auth;
pub mod business_areas;
pub mod health;
pub mod records;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(business_areas::routes())
        .merge(audit::routes())
        .merge(records::routes::<ProcessRepository>())
        .merge(records::routes::<RiskMatrixRepository>())
        .merge(records::routes::<QualityObjectiveRepository>())
        .merge(records::routes::<MonitoringControlRepository>())
        .merge(records::routes::<TrainingSessionRepository>())
        .merge(records::routes::<ThirdPartyEvaluationRepository>())
        .merge(records::routes::<FeedbackSystemRepository>())
        .merge(records::routes::<QmsAssessmentRepository>())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use qms_core::storage::{StorageConfig, StorageProvider, StorageService};
    use qms_shared::{JwtConfig, JwtService};
    use sea_orm::DatabaseConnection;

    use crate::AppState;

    /// Builds an `AppState` with a disconnected database, suitable for
    /// routing and middleware tests that never reach a repository.
    pub(crate) fn test_state() -> AppState {
        let storage = StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(
            "./test-uploads",
        )))
        .expect("local fs storage");

        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            storage: Arc::new(storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::test_support::test_state;
    use crate::create_router;

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::get("/api/v1/business-areas")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_route_rejects_garbage_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::get("/api/v1/business-areas")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
