//! Authentication types for JWT tokens and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims carried by the `authToken` cookie or `Authorization` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i64,
    /// User email.
    pub email: String,
    /// Username for display.
    pub username: String,
    /// The user's primary business area.
    pub business_area: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: i64,
        email: &str,
        username: &str,
        business_area: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            username: username.to_string(),
            business_area: business_area.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User email.
    pub email: String,
    /// Username for display.
    pub username: String,
    /// User password.
    pub password: String,
    /// The user's primary business area.
    pub business_area: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Signed access token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// User email.
    pub email: String,
    /// Username for display.
    pub username: String,
    /// The user's primary business area.
    pub business_area: String,
    /// All business areas the user may access (primary plus grants).
    pub accessible_business_areas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let expires_at = Utc::now() + Duration::hours(8);

        let claims = Claims::new(42, "jane@example.com", "jane", "Finance", expires_at);

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.username, "jane");
        assert_eq!(claims.business_area, "Finance");
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_user_id_returns_sub() {
        let claims = Claims::new(
            7,
            "a@b.c",
            "a",
            "Quality Management",
            Utc::now() + Duration::hours(1),
        );
        assert_eq!(claims.user_id(), 7);
    }
}
