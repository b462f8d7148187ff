//! Business area repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::business_areas;

/// Business area repository.
#[derive(Debug, Clone)]
pub struct BusinessAreaRepository {
    db: DatabaseConnection,
}

impl BusinessAreaRepository {
    /// Creates a new business area repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all business areas, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<business_areas::Model>, DbErr> {
        business_areas::Entity::find()
            .order_by_asc(business_areas::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a business area by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<business_areas::Model>, DbErr> {
        business_areas::Entity::find()
            .filter(business_areas::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a new business area.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, name: &str) -> Result<business_areas::Model, DbErr> {
        let area = business_areas::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        area.insert(&self.db).await
    }
}
