//! Authentication routes for register, login, and current-user lookup.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::middleware::auth::AUTH_COOKIE;
use crate::AppState;
use qms_core::auth::{hash_password, verify_password};
use qms_db::{BusinessAreaRepository, UserRepository};
use qms_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the auth routes that require an authenticated caller.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if !payload.email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "A valid email address is required"
            })),
        )
            .into_response();
    }
    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let area_repo = BusinessAreaRepository::new((*state.db).clone());

    // The primary business area must already exist
    match area_repo.find_by_name(&payload.business_area).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unknown_business_area",
                    "message": "The requested business area does not exist"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error checking business area");
            return internal_error();
        }
    }

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return internal_error();
        }
    };

    let user = match user_repo
        .create(
            &payload.email,
            &payload.username,
            &password_hash,
            &payload.business_area,
        )
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error();
        }
    };

    info!(user_id = user.id, "User registered");

    (
        StatusCode::CREATED,
        Json(UserInfo {
            id: user.id,
            email: user.email,
            username: user.username,
            business_area: user.business_area.clone(),
            accessible_business_areas: vec![user.business_area],
        }),
    )
        .into_response()
}

/// POST /auth/login - Authenticate and return a token.
///
/// The token is returned in the response body and also set as the
/// `authToken` cookie for browser clients.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let scope = match user_repo.accessible_business_areas(user.id).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to resolve access scope");
            return internal_error();
        }
    };

    let token = match state.jwt_service.generate_token(
        user.id,
        &user.email,
        &user.username,
        &user.business_area,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return internal_error();
        }
    };

    info!(user_id = user.id, "User logged in");

    let mut areas: Vec<String> = scope.iter().map(str::to_owned).collect();
    areas.sort();

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            username: user.username,
            business_area: user.business_area,
            accessible_business_areas: areas,
        },
        token: token.clone(),
        expires_in: state.jwt_service.token_expires_in(),
    };

    let cookie = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (jar.add(cookie), Json(response)).into_response()
}

/// GET /auth/me - Return the authenticated user's profile and scope.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // Token outlived the user row
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "User account no longer exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error loading user");
            return internal_error();
        }
    };

    let scope = match user_repo.accessible_business_areas(user.id).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to resolve access scope");
            return internal_error();
        }
    };

    let mut areas: Vec<String> = scope.iter().map(str::to_owned).collect();
    areas.sort();

    Json(UserInfo {
        id: user.id,
        email: user.email,
        username: user.username,
        business_area: user.business_area,
        accessible_business_areas: areas,
    })
    .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
