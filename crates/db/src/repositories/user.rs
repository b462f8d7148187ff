//! User repository for database operations.

use qms_core::record::AccessScope;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{business_areas, user_business_areas, users};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        business_area: &str,
    ) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            business_area: Set(business_area.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Resolves the full access scope for a user: their primary business
    /// area plus every cross-area grant.
    ///
    /// Returns an empty scope when the user row no longer exists; callers
    /// must treat that as unauthorized, not as a filter matching nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accessible_business_areas(&self, user_id: i64) -> Result<AccessScope, DbErr> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(AccessScope::default());
        };

        let grants = user_business_areas::Entity::find()
            .filter(user_business_areas::Column::UserId.eq(user_id))
            .find_also_related(business_areas::Entity)
            .all(&self.db)
            .await?;

        let areas = std::iter::once(user.business_area)
            .chain(grants.into_iter().filter_map(|(_, area)| area.map(|a| a.name)));

        Ok(AccessScope::new(areas))
    }

    /// Grants a user access to an additional business area.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn grant_business_area(
        &self,
        user_id: i64,
        business_area_id: i64,
    ) -> Result<(), DbErr> {
        let grant = user_business_areas::ActiveModel {
            user_id: Set(user_id),
            business_area_id: Set(business_area_id),
            created_at: Set(chrono::Utc::now().into()),
        };
        grant.insert(&self.db).await?;
        Ok(())
    }
}
