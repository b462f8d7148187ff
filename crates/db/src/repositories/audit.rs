//! Audit log repository.
//!
//! The trail is append-only: this module exposes insert and read paths and
//! nothing else. The insert helper also runs inside the soft-delete
//! transaction so the deletion fields and the audit entry commit together.

use chrono::Utc;
use qms_core::audit::{AuditDraft, AuditEntry, AuditRecorder};
use qms_core::record::RecordError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::audit_log;

fn to_entry(model: audit_log::Model) -> AuditEntry {
    AuditEntry {
        id: model.id,
        table_name: model.table_name,
        record_id: model.record_id,
        deleted_at: model.deleted_at.with_timezone(&Utc),
        deleted_by: model.deleted_by,
        business_area: model.business_area,
        file_name: model.file_name,
        file_cleanup_success: model.file_cleanup_success,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Inserts one audit row on any connection, including an open transaction.
pub(crate) async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    draft: AuditDraft,
) -> Result<AuditEntry, RecordError> {
    let entry = audit_log::ActiveModel {
        table_name: Set(draft.table_name.to_string()),
        record_id: Set(draft.record_id),
        deleted_at: Set(draft.deleted_at.into()),
        deleted_by: Set(draft.deleted_by),
        business_area: Set(draft.business_area),
        file_name: Set(draft.file_name),
        file_cleanup_success: Set(draft.file_cleanup_success),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    entry
        .insert(conn)
        .await
        .map(to_entry)
        .map_err(|e| RecordError::repository(e.to_string()))
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists audit entries, most recent deletion first, optionally filtered
    /// by source table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        table_name: Option<&str>,
        limit: u64,
    ) -> Result<Vec<AuditEntry>, RecordError> {
        let mut query = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::DeletedAt)
            .limit(limit);

        if let Some(table) = table_name {
            query = query.filter(audit_log::Column::TableName.eq(table));
        }

        query
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(to_entry).collect())
            .map_err(|e| RecordError::repository(e.to_string()))
    }

    /// Lists audit entries for one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_record(
        &self,
        table_name: &str,
        record_id: i64,
    ) -> Result<Vec<AuditEntry>, RecordError> {
        audit_log::Entity::find()
            .filter(audit_log::Column::TableName.eq(table_name))
            .filter(audit_log::Column::RecordId.eq(record_id))
            .order_by_desc(audit_log::Column::DeletedAt)
            .all(&self.db)
            .await
            .map(|models| models.into_iter().map(to_entry).collect())
            .map_err(|e| RecordError::repository(e.to_string()))
    }
}

impl AuditRecorder for AuditLogRepository {
    async fn record(&self, draft: AuditDraft) -> Result<AuditEntry, RecordError> {
        insert_entry(&self.db, draft).await
    }
}
