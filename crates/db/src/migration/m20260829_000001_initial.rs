//! Initial schema migration.
//!
//! Creates users, business areas, cross-area grants, the eight record
//! tables plus their version-history tables, and the audit log. The record
//! and version tables are generated from `RecordKind` so the schema cannot
//! drift from the kinds the code dispatches on.

use qms_core::record::RecordKind;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(BASE_SQL).await?;
        for kind in RecordKind::ALL {
            db.execute_unprepared(&record_table_sql(kind.table_name()))
                .await?;
            db.execute_unprepared(&version_table_sql(
                kind.version_table_name(),
                kind.table_name(),
            ))
            .await?;
        }
        db.execute_unprepared(AUDIT_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS audit_log CASCADE;")
            .await?;
        for kind in RecordKind::ALL {
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS {} CASCADE;",
                kind.version_table_name()
            ))
            .await?;
            db.execute_unprepared(&format!(
                "DROP TABLE IF EXISTS {} CASCADE;",
                kind.table_name()
            ))
            .await?;
        }
        db.execute_unprepared(
            "DROP TABLE IF EXISTS user_business_areas CASCADE;\n\
             DROP TABLE IF EXISTS users CASCADE;\n\
             DROP TABLE IF EXISTS business_areas CASCADE;",
        )
        .await?;

        Ok(())
    }
}

const BASE_SQL: &str = r"
-- Business areas scope every record and every user
CREATE TABLE business_areas (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    username VARCHAR(100) NOT NULL,
    password_hash TEXT NOT NULL,
    business_area TEXT NOT NULL REFERENCES business_areas(name),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Cross-area access grants beyond the user's primary business area
CREATE TABLE user_business_areas (
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    business_area_id BIGINT NOT NULL REFERENCES business_areas(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (user_id, business_area_id)
);
";

/// Builds the CREATE TABLE statement for one record table.
///
/// The CHECK constraint enforces that `deleted_at` and `deleted_by` are set
/// together or not at all.
fn record_table_sql(table: &str) -> String {
    format!(
        r"
CREATE TABLE {table} (
    id BIGSERIAL PRIMARY KEY,
    business_area TEXT NOT NULL REFERENCES business_areas(name),
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    details JSONB NOT NULL DEFAULT '{{}}'::jsonb,
    file_url TEXT,
    file_name TEXT,
    file_size BIGINT,
    file_type TEXT,
    version TEXT,
    created_by BIGINT NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ,
    deleted_by BIGINT REFERENCES users(id),
    CONSTRAINT chk_{table}_soft_delete_pair CHECK ((deleted_at IS NULL) = (deleted_by IS NULL))
);

-- Scope-filtered listing of active records
CREATE INDEX idx_{table}_area_active ON {table}(business_area) WHERE deleted_at IS NULL;
"
    )
}

/// Builds the CREATE TABLE statement for one version-history table.
fn version_table_sql(table: &str, parent: &str) -> String {
    format!(
        r"
CREATE TABLE {table} (
    id BIGSERIAL PRIMARY KEY,
    record_id BIGINT NOT NULL REFERENCES {parent}(id) ON DELETE CASCADE,
    version_label TEXT NOT NULL,
    file_url TEXT NOT NULL,
    file_name TEXT,
    file_size BIGINT,
    file_type TEXT,
    uploaded_by BIGINT NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_{table}_record ON {table}(record_id, created_at DESC);
"
    )
}

const AUDIT_SQL: &str = r"
-- Append-only deletion audit trail; no update or delete paths exist
CREATE TABLE audit_log (
    id BIGSERIAL PRIMARY KEY,
    table_name TEXT NOT NULL,
    record_id BIGINT NOT NULL,
    deleted_at TIMESTAMPTZ NOT NULL,
    deleted_by BIGINT NOT NULL REFERENCES users(id),
    business_area TEXT,
    file_name TEXT,
    file_cleanup_success BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_log_table_record ON audit_log(table_name, record_id);
CREATE INDEX idx_audit_log_deleted_at ON audit_log(deleted_at DESC);
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_table_sql_shape() {
        let sql = record_table_sql("processes");
        assert!(sql.contains("CREATE TABLE processes ("));
        assert!(sql.contains("details JSONB NOT NULL DEFAULT '{}'::jsonb"));
        assert!(sql.contains("chk_processes_soft_delete_pair"));
        assert!(sql.contains("(deleted_at IS NULL) = (deleted_by IS NULL)"));
    }

    #[test]
    fn test_version_table_sql_references_parent() {
        let sql = version_table_sql("process_versions", "processes");
        assert!(sql.contains("CREATE TABLE process_versions ("));
        assert!(sql.contains("REFERENCES processes(id) ON DELETE CASCADE"));
        assert!(sql.contains("version_label TEXT NOT NULL"));
    }

    #[test]
    fn test_every_kind_gets_both_tables() {
        for kind in RecordKind::ALL {
            assert!(record_table_sql(kind.table_name()).contains(kind.table_name()));
            assert!(
                version_table_sql(kind.version_table_name(), kind.table_name())
                    .contains(kind.version_table_name())
            );
        }
    }
}
