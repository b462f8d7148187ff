//! Per-entity record adapters.
//!
//! Each of the eight record kinds gets a concrete repository bound to its
//! own table pair. The adapters share one implementation, generated by
//! macro, behind the [`RecordAdapter`] trait so HTTP handlers can be
//! written once and instantiated per kind. Which version-history table a
//! snapshot lands in is thereby fixed at compile time.

use std::future::Future;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use qms_core::record::{AccessScope, FileRef, NewRecord, Record, RecordError, RecordKind, UpdateRecord};
use qms_core::softdelete::{FileCleanup, SoftDeleteEngine, SoftDeleteOutcome, SoftDeleteStore};
use qms_core::version::{
    FileVersionEntry, FileVersionSnapshot, FileVersionTracker, VersionHistoryRepository,
};

use crate::repositories::audit::insert_entry;

/// Contract every per-entity adapter fulfils.
pub trait RecordAdapter: Clone + Send + Sync + 'static {
    /// The record kind this adapter persists.
    const KIND: RecordKind;

    /// Creates the adapter over a connection handle.
    fn new(db: DatabaseConnection) -> Self;

    /// Creates a record in one of the caller's business areas.
    fn create(
        &self,
        input: NewRecord,
        caller_id: i64,
        scope: &AccessScope,
    ) -> impl Future<Output = Result<Record, RecordError>> + Send;

    /// Loads one active record within the caller's scope.
    fn get(
        &self,
        id: i64,
        scope: &AccessScope,
    ) -> impl Future<Output = Result<Record, RecordError>> + Send;

    /// Lists active records within the caller's scope, newest first.
    fn list(
        &self,
        scope: &AccessScope,
    ) -> impl Future<Output = Result<Vec<Record>, RecordError>> + Send;

    /// Applies a partial update. When the attached file is replaced, the
    /// outgoing file is snapshotted into the version-history table and the
    /// version label bumped; snapshot and update commit together.
    fn update(
        &self,
        id: i64,
        input: UpdateRecord,
        caller_id: i64,
        scope: &AccessScope,
    ) -> impl Future<Output = Result<Record, RecordError>> + Send;

    /// Soft-deletes one record: deletion fields plus one audit entry in a
    /// single transaction, with best-effort cleanup of the attached file.
    fn soft_delete<F: FileCleanup>(
        &self,
        id: i64,
        caller_id: i64,
        scope: &AccessScope,
        files: F,
    ) -> impl Future<Output = Result<SoftDeleteOutcome, RecordError>> + Send;

    /// Lists the record's file version history, newest first. Soft-deleted
    /// records keep their history readable.
    fn list_versions(
        &self,
        id: i64,
        scope: &AccessScope,
    ) -> impl Future<Output = Result<Vec<FileVersionEntry>, RecordError>> + Send;
}

fn repo_err(e: sea_orm::DbErr) -> RecordError {
    RecordError::repository(e.to_string())
}

fn assemble_file(
    url: Option<String>,
    name: Option<String>,
    size: Option<i64>,
    file_type: Option<String>,
) -> Option<FileRef> {
    url.map(|url| FileRef {
        url,
        name,
        size,
        file_type,
    })
}

macro_rules! record_adapter {
    ($module:ident, $adapter:ident, $records:ident, $versions:ident, $kind:expr) => {
        mod $module {
            use super::*;
            use crate::entities::{$records as records, $versions as versions};

            #[doc = concat!("Record adapter bound to the `", stringify!($records), "` table pair.")]
            #[derive(Debug, Clone)]
            pub struct $adapter {
                db: DatabaseConnection,
            }

            fn scope_filter(scope: &AccessScope) -> sea_orm::sea_query::SimpleExpr {
                records::Column::BusinessArea.is_in(scope.iter())
            }

            fn to_record(model: records::Model) -> Record {
                Record {
                    id: model.id,
                    business_area: model.business_area,
                    title: model.title,
                    description: model.description,
                    status: model.status,
                    details: model.details,
                    file: assemble_file(
                        model.file_url,
                        model.file_name,
                        model.file_size,
                        model.file_type,
                    ),
                    version: model.version,
                    created_by: model.created_by,
                    created_at: model.created_at.with_timezone(&Utc),
                    updated_at: model.updated_at.with_timezone(&Utc),
                    deleted_at: model.deleted_at.map(|t| t.with_timezone(&Utc)),
                    deleted_by: model.deleted_by,
                }
            }

            fn to_version_entry(model: versions::Model) -> FileVersionEntry {
                FileVersionEntry {
                    id: model.id,
                    record_id: model.record_id,
                    version_label: model.version_label,
                    file_url: model.file_url,
                    file_name: model.file_name,
                    file_size: model.file_size,
                    file_type: model.file_type,
                    uploaded_by: model.uploaded_by,
                    created_at: model.created_at.with_timezone(&Utc),
                }
            }

            /// Version-history writes bound to an open update transaction.
            struct TxnVersions<'a> {
                txn: &'a DatabaseTransaction,
            }

            impl VersionHistoryRepository for TxnVersions<'_> {
                async fn insert_snapshot(
                    &self,
                    snapshot: FileVersionSnapshot,
                ) -> Result<(), RecordError> {
                    let row = versions::ActiveModel {
                        record_id: Set(snapshot.record_id),
                        version_label: Set(snapshot.version_label),
                        file_url: Set(snapshot.file_url),
                        file_name: Set(snapshot.file_name),
                        file_size: Set(snapshot.file_size),
                        file_type: Set(snapshot.file_type),
                        uploaded_by: Set(snapshot.uploaded_by),
                        created_at: Set(Utc::now().into()),
                        ..Default::default()
                    };
                    row.insert(self.txn).await.map_err(repo_err)?;
                    Ok(())
                }
            }

            impl RecordAdapter for $adapter {
                const KIND: RecordKind = $kind;

                fn new(db: DatabaseConnection) -> Self {
                    Self { db }
                }

                async fn create(
                    &self,
                    input: NewRecord,
                    caller_id: i64,
                    scope: &AccessScope,
                ) -> Result<Record, RecordError> {
                    if !scope.contains(&input.business_area) {
                        return Err(RecordError::forbidden(format!(
                            "no access to business area '{}'",
                            input.business_area
                        )));
                    }

                    let now = Utc::now();
                    let (file_url, file_name, file_size, file_type) = match input.file {
                        Some(file) => (Some(file.url), file.name, file.size, file.file_type),
                        None => (None, None, None, None),
                    };
                    // A record created with an attachment starts its version
                    // history at "1.0".
                    let version = file_url.as_ref().map(|_| "1.0".to_string());

                    let model = records::ActiveModel {
                        business_area: Set(input.business_area),
                        title: Set(input.title),
                        description: Set(input.description),
                        status: Set(input.status),
                        details: Set(input.details),
                        file_url: Set(file_url),
                        file_name: Set(file_name),
                        file_size: Set(file_size),
                        file_type: Set(file_type),
                        version: Set(version),
                        created_by: Set(caller_id),
                        created_at: Set(now.into()),
                        updated_at: Set(now.into()),
                        deleted_at: Set(None),
                        deleted_by: Set(None),
                        ..Default::default()
                    };

                    model.insert(&self.db).await.map(to_record).map_err(repo_err)
                }

                async fn get(&self, id: i64, scope: &AccessScope) -> Result<Record, RecordError> {
                    records::Entity::find_by_id(id)
                        .filter(records::Column::DeletedAt.is_null())
                        .filter(scope_filter(scope))
                        .one(&self.db)
                        .await
                        .map_err(repo_err)?
                        .map(to_record)
                        .ok_or(RecordError::NotFoundOrForbidden)
                }

                async fn list(&self, scope: &AccessScope) -> Result<Vec<Record>, RecordError> {
                    records::Entity::find()
                        .filter(records::Column::DeletedAt.is_null())
                        .filter(scope_filter(scope))
                        .order_by_desc(records::Column::CreatedAt)
                        .all(&self.db)
                        .await
                        .map(|models| models.into_iter().map(to_record).collect())
                        .map_err(repo_err)
                }

                async fn update(
                    &self,
                    id: i64,
                    input: UpdateRecord,
                    caller_id: i64,
                    scope: &AccessScope,
                ) -> Result<Record, RecordError> {
                    let txn = self.db.begin().await.map_err(repo_err)?;

                    let model = records::Entity::find_by_id(id)
                        .filter(records::Column::DeletedAt.is_null())
                        .filter(scope_filter(scope))
                        .one(&txn)
                        .await
                        .map_err(repo_err)?
                        .ok_or(RecordError::NotFoundOrForbidden)?;
                    let current = to_record(model.clone());

                    let tracker = FileVersionTracker::new(TxnVersions { txn: &txn });
                    let bumped = tracker
                        .maybe_snapshot_and_bump(
                            id,
                            current.file.as_ref(),
                            current.version.as_deref(),
                            input.file.as_ref().map(|f| f.url.as_str()),
                            caller_id,
                        )
                        .await?;

                    let mut active: records::ActiveModel = model.into();
                    if let Some(title) = input.title {
                        active.title = Set(title);
                    }
                    if let Some(description) = input.description {
                        active.description = Set(Some(description));
                    }
                    if let Some(status) = input.status {
                        active.status = Set(status);
                    }
                    if let Some(details) = input.details {
                        active.details = Set(details);
                    }
                    if let Some(file) = input.file {
                        active.file_url = Set(Some(file.url));
                        active.file_name = Set(file.name);
                        active.file_size = Set(file.size);
                        active.file_type = Set(file.file_type);
                        if let Some(label) = bumped {
                            active.version = Set(Some(label));
                        } else if current.version.is_none() {
                            // First-ever attachment: no snapshot, label starts
                            // at "1.0".
                            active.version = Set(Some("1.0".to_string()));
                        }
                    }
                    active.updated_at = Set(Utc::now().into());

                    let updated = active.update(&txn).await.map_err(repo_err)?;
                    txn.commit().await.map_err(repo_err)?;

                    Ok(to_record(updated))
                }

                async fn soft_delete<F: FileCleanup>(
                    &self,
                    id: i64,
                    caller_id: i64,
                    scope: &AccessScope,
                    files: F,
                ) -> Result<SoftDeleteOutcome, RecordError> {
                    SoftDeleteEngine::new(self.clone(), files)
                        .soft_delete(Self::KIND, id, scope, caller_id)
                        .await
                }

                async fn list_versions(
                    &self,
                    id: i64,
                    scope: &AccessScope,
                ) -> Result<Vec<FileVersionEntry>, RecordError> {
                    // Scope gate through the parent record; deliberately no
                    // deleted_at filter so history survives soft deletion.
                    let parent = records::Entity::find_by_id(id)
                        .filter(scope_filter(scope))
                        .one(&self.db)
                        .await
                        .map_err(repo_err)?;
                    if parent.is_none() {
                        return Err(RecordError::NotFoundOrForbidden);
                    }

                    versions::Entity::find()
                        .filter(versions::Column::RecordId.eq(id))
                        .order_by_desc(versions::Column::CreatedAt)
                        .all(&self.db)
                        .await
                        .map(|models| models.into_iter().map(to_version_entry).collect())
                        .map_err(repo_err)
                }
            }

            impl SoftDeleteStore for $adapter {
                async fn find_active(
                    &self,
                    id: i64,
                    scope: &AccessScope,
                ) -> Result<Option<Record>, RecordError> {
                    records::Entity::find_by_id(id)
                        .filter(records::Column::DeletedAt.is_null())
                        .filter(scope_filter(scope))
                        .one(&self.db)
                        .await
                        .map(|model| model.map(to_record))
                        .map_err(repo_err)
                }

                async fn mark_deleted(
                    &self,
                    id: i64,
                    deleted_by: i64,
                    deleted_at: chrono::DateTime<Utc>,
                    audit: qms_core::audit::AuditDraft,
                ) -> Result<(Record, qms_core::audit::AuditEntry), RecordError> {
                    let txn = self.db.begin().await.map_err(repo_err)?;

                    let model = records::Entity::find_by_id(id)
                        .filter(records::Column::DeletedAt.is_null())
                        .one(&txn)
                        .await
                        .map_err(repo_err)?
                        .ok_or(RecordError::NotFoundOrForbidden)?;

                    let mut active: records::ActiveModel = model.into();
                    active.deleted_at = Set(Some(deleted_at.into()));
                    active.deleted_by = Set(Some(deleted_by));
                    let deleted = active.update(&txn).await.map_err(repo_err)?;

                    let entry = insert_entry(&txn, audit).await?;
                    txn.commit().await.map_err(repo_err)?;

                    Ok((to_record(deleted), entry))
                }
            }
        }
        pub use $module::$adapter;
    };
}

record_adapter!(
    process_adapter,
    ProcessRepository,
    processes,
    process_versions,
    RecordKind::BusinessProcess
);
record_adapter!(
    risk_matrix_adapter,
    RiskMatrixRepository,
    risk_matrix,
    risk_matrix_versions,
    RecordKind::RiskMatrixEntry
);
record_adapter!(
    quality_objective_adapter,
    QualityObjectiveRepository,
    quality_objectives,
    quality_objective_versions,
    RecordKind::QualityObjective
);
record_adapter!(
    monitoring_control_adapter,
    MonitoringControlRepository,
    monitoring_controls,
    monitoring_control_versions,
    RecordKind::PerformanceMonitoringControl
);
record_adapter!(
    training_session_adapter,
    TrainingSessionRepository,
    training_sessions,
    training_session_versions,
    RecordKind::TrainingSession
);
record_adapter!(
    third_party_evaluation_adapter,
    ThirdPartyEvaluationRepository,
    third_party_evaluations,
    third_party_evaluation_versions,
    RecordKind::ThirdPartyEvaluation
);
record_adapter!(
    feedback_system_adapter,
    FeedbackSystemRepository,
    feedback_systems,
    feedback_system_versions,
    RecordKind::CustomerFeedbackSystem
);
record_adapter!(
    qms_assessment_adapter,
    QmsAssessmentRepository,
    qms_assessments,
    qms_assessment_versions,
    RecordKind::QmsAssessment
);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityName;

    macro_rules! assert_tables_match {
        ($adapter:ident, $records:ident, $versions:ident) => {
            assert_eq!(
                crate::entities::$records::Entity.table_name(),
                <$adapter as RecordAdapter>::KIND.table_name()
            );
            assert_eq!(
                crate::entities::$versions::Entity.table_name(),
                <$adapter as RecordAdapter>::KIND.version_table_name()
            );
        };
    }

    #[test]
    fn test_adapter_tables_match_kinds() {
        assert_tables_match!(ProcessRepository, processes, process_versions);
        assert_tables_match!(RiskMatrixRepository, risk_matrix, risk_matrix_versions);
        assert_tables_match!(
            QualityObjectiveRepository,
            quality_objectives,
            quality_objective_versions
        );
        assert_tables_match!(
            MonitoringControlRepository,
            monitoring_controls,
            monitoring_control_versions
        );
        assert_tables_match!(
            TrainingSessionRepository,
            training_sessions,
            training_session_versions
        );
        assert_tables_match!(
            ThirdPartyEvaluationRepository,
            third_party_evaluations,
            third_party_evaluation_versions
        );
        assert_tables_match!(
            FeedbackSystemRepository,
            feedback_systems,
            feedback_system_versions
        );
        assert_tables_match!(
            QmsAssessmentRepository,
            qms_assessments,
            qms_assessment_versions
        );
    }

    #[test]
    fn test_assemble_file_requires_url() {
        assert!(assemble_file(None, Some("a.pdf".into()), Some(1), None).is_none());

        let file = assemble_file(
            Some("areas/finance/a.pdf".into()),
            Some("a.pdf".into()),
            Some(1024),
            Some("application/pdf".into()),
        )
        .expect("url present");
        assert_eq!(file.url, "areas/finance/a.pdf");
        assert_eq!(file.name.as_deref(), Some("a.pdf"));
    }
}
