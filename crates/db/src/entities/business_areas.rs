//! `SeaORM` entity for the business areas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "business_areas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_business_areas::Entity")]
    UserBusinessAreas,
}

impl Related<super::user_business_areas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBusinessAreas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
