//! `SeaORM` entity for cross-area access grants.
//!
//! A row grants a user access to a business area beyond their primary one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_business_areas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub business_area_id: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::business_areas::Entity",
        from = "Column::BusinessAreaId",
        to = "super::business_areas::Column::Id"
    )]
    BusinessAreas,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::business_areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessAreas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
