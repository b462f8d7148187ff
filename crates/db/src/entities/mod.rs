//! `SeaORM` entity definitions.
//!
//! The eight record kinds share one column shape, as do their eight
//! version-history tables; both families are generated by macro so the
//! shapes cannot drift apart.

pub mod audit_log;
pub mod business_areas;
pub mod user_business_areas;
pub mod users;

macro_rules! record_entity {
    ($module:ident, $table:literal) => {
        #[doc = concat!("`SeaORM` entity for the `", $table, "` table.")]
        pub mod $module {
            use sea_orm::entity::prelude::*;
            use serde::{Deserialize, Serialize};

            #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
            #[sea_orm(table_name = $table)]
            pub struct Model {
                #[sea_orm(primary_key)]
                pub id: i64,
                pub business_area: String,
                pub title: String,
                pub description: Option<String>,
                pub status: String,
                #[sea_orm(column_type = "JsonBinary")]
                pub details: Json,
                pub file_url: Option<String>,
                pub file_name: Option<String>,
                pub file_size: Option<i64>,
                pub file_type: Option<String>,
                pub version: Option<String>,
                pub created_by: i64,
                pub created_at: DateTimeWithTimeZone,
                pub updated_at: DateTimeWithTimeZone,
                pub deleted_at: Option<DateTimeWithTimeZone>,
                pub deleted_by: Option<i64>,
            }

            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {}

            impl ActiveModelBehavior for ActiveModel {}
        }
    };
}

macro_rules! version_entity {
    ($module:ident, $table:literal) => {
        #[doc = concat!("`SeaORM` entity for the `", $table, "` history table.")]
        pub mod $module {
            use sea_orm::entity::prelude::*;
            use serde::{Deserialize, Serialize};

            #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
            #[sea_orm(table_name = $table)]
            pub struct Model {
                #[sea_orm(primary_key)]
                pub id: i64,
                pub record_id: i64,
                pub version_label: String,
                pub file_url: String,
                pub file_name: Option<String>,
                pub file_size: Option<i64>,
                pub file_type: Option<String>,
                pub uploaded_by: i64,
                pub created_at: DateTimeWithTimeZone,
            }

            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {}

            impl ActiveModelBehavior for ActiveModel {}
        }
    };
}

record_entity!(processes, "processes");
record_entity!(risk_matrix, "risk_matrix");
record_entity!(quality_objectives, "quality_objectives");
record_entity!(monitoring_controls, "monitoring_controls");
record_entity!(training_sessions, "training_sessions");
record_entity!(third_party_evaluations, "third_party_evaluations");
record_entity!(feedback_systems, "feedback_systems");
record_entity!(qms_assessments, "qms_assessments");

version_entity!(process_versions, "process_versions");
version_entity!(risk_matrix_versions, "risk_matrix_versions");
version_entity!(quality_objective_versions, "quality_objective_versions");
version_entity!(monitoring_control_versions, "monitoring_control_versions");
version_entity!(training_session_versions, "training_session_versions");
version_entity!(third_party_evaluation_versions, "third_party_evaluation_versions");
version_entity!(feedback_system_versions, "feedback_system_versions");
version_entity!(qms_assessment_versions, "qms_assessment_versions");
