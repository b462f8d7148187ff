//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the eight record resources
//! - Authentication middleware (bearer header or `authToken` cookie)
//! - Business area and audit trail endpoints

pub mod middleware;
pub mod routes;

use axum::Router;
use qms_core::storage::StorageService;
use qms_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
///
/// Everything here is injected at startup; handlers never read ambient
/// global state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Storage service for record attachments.
    pub storage: Arc<StorageService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
