//! Soft-delete engine.
//!
//! Soft deletion marks a record as deleted (`deleted_at` + `deleted_by`)
//! instead of removing it, appends one audit entry, and attempts best-effort
//! cleanup of the record's attached file. Cleanup failure never fails the
//! delete; its outcome is reported and recorded in the audit entry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditDraft, AuditEntry};
use crate::record::{AccessScope, Record, RecordError, RecordKind};

/// Persistence contract the soft-delete engine drives.
///
/// `mark_deleted` must apply the deletion fields and append the audit entry
/// atomically (one transaction), closing the crash window between the two
/// writes.
pub trait SoftDeleteStore: Send + Sync {
    /// Loads the record iff it exists, is not soft-deleted, and belongs to
    /// one of the scope's business areas.
    fn find_active(
        &self,
        id: i64,
        scope: &AccessScope,
    ) -> impl std::future::Future<Output = Result<Option<Record>, RecordError>> + Send;

    /// Atomically sets `deleted_at`/`deleted_by` and appends the audit entry.
    fn mark_deleted(
        &self,
        id: i64,
        deleted_by: i64,
        deleted_at: DateTime<Utc>,
        audit: AuditDraft,
    ) -> impl std::future::Future<Output = Result<(Record, AuditEntry), RecordError>> + Send;
}

/// Best-effort blob cleanup collaborator.
pub trait FileCleanup: Send + Sync {
    /// Deletes the file behind `url`, returning whether it succeeded.
    fn delete_file(&self, url: &str) -> impl std::future::Future<Output = bool> + Send;
}

impl<T: FileCleanup> FileCleanup for std::sync::Arc<T> {
    fn delete_file(&self, url: &str) -> impl std::future::Future<Output = bool> + Send {
        T::delete_file(self, url)
    }
}

/// Result of a successful soft delete.
#[derive(Debug, Clone, Serialize)]
pub struct SoftDeleteOutcome {
    /// The record with its deletion fields set.
    pub record: Record,
    /// Whether blob cleanup of the attached file succeeded (true when the
    /// record carried no file).
    pub file_cleanup_success: bool,
    /// The audit entry written for this deletion.
    pub audit: AuditEntry,
}

/// Soft-delete engine composing the store, the audit trail, and blob cleanup.
pub struct SoftDeleteEngine<S, F> {
    store: S,
    files: F,
}

impl<S: SoftDeleteStore, F: FileCleanup> SoftDeleteEngine<S, F> {
    /// Creates an engine over the given store and file cleanup collaborator.
    pub const fn new(store: S, files: F) -> Self {
        Self { store, files }
    }

    /// Soft-deletes one record.
    ///
    /// Preconditions (all merged into `NotFoundOrForbidden` so existence
    /// never leaks across business-area boundaries): the record exists, is
    /// not already soft-deleted, and lies within the caller's scope.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFoundOrForbidden` when a precondition fails,
    /// or `RecordError::Repository` on datastore failure.
    pub async fn soft_delete(
        &self,
        kind: RecordKind,
        id: i64,
        scope: &AccessScope,
        caller_id: i64,
    ) -> Result<SoftDeleteOutcome, RecordError> {
        let record = self
            .store
            .find_active(id, scope)
            .await?
            .ok_or(RecordError::NotFoundOrForbidden)?;

        // Best-effort cleanup: awaited and reported, never escalated.
        let file_cleanup_success = match &record.file {
            Some(file) => {
                let ok = self.files.delete_file(&file.url).await;
                if !ok {
                    warn!(
                        table = kind.table_name(),
                        record_id = id,
                        file_url = %file.url,
                        "file cleanup failed during soft delete"
                    );
                }
                ok
            }
            None => true,
        };

        let deleted_at = Utc::now();
        let draft = AuditDraft {
            table_name: kind.table_name(),
            record_id: id,
            deleted_at,
            deleted_by: caller_id,
            business_area: Some(record.business_area.clone()),
            file_name: record.file.as_ref().and_then(|f| f.name.clone()),
            file_cleanup_success,
        };

        let (record, audit) = self.store.mark_deleted(id, caller_id, deleted_at, draft).await?;

        Ok(SoftDeleteOutcome {
            record,
            file_cleanup_success,
            audit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileRef;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory store over a map of records.
    struct MockStore {
        records: Mutex<HashMap<i64, Record>>,
        audits: Mutex<Vec<AuditEntry>>,
    }

    impl MockStore {
        fn new(records: impl IntoIterator<Item = Record>) -> Self {
            Self {
                records: Mutex::new(records.into_iter().map(|r| (r.id, r)).collect()),
                audits: Mutex::new(Vec::new()),
            }
        }
    }

    impl SoftDeleteStore for &MockStore {
        async fn find_active(
            &self,
            id: i64,
            scope: &AccessScope,
        ) -> Result<Option<Record>, RecordError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&id)
                .filter(|r| r.is_active() && scope.contains(&r.business_area))
                .cloned())
        }

        async fn mark_deleted(
            &self,
            id: i64,
            deleted_by: i64,
            deleted_at: chrono::DateTime<Utc>,
            audit: AuditDraft,
        ) -> Result<(Record, AuditEntry), RecordError> {
            let mut records = self.records.lock().unwrap();
            let record = records.get_mut(&id).ok_or(RecordError::NotFoundOrForbidden)?;
            record.deleted_at = Some(deleted_at);
            record.deleted_by = Some(deleted_by);

            let mut audits = self.audits.lock().unwrap();
            let entry = AuditEntry {
                id: i64::try_from(audits.len()).unwrap() + 1,
                table_name: audit.table_name.to_string(),
                record_id: audit.record_id,
                deleted_at: audit.deleted_at,
                deleted_by: audit.deleted_by,
                business_area: audit.business_area,
                file_name: audit.file_name,
                file_cleanup_success: audit.file_cleanup_success,
                created_at: Utc::now(),
            };
            audits.push(entry.clone());

            Ok((record.clone(), entry))
        }
    }

    /// Cleanup stub with a fixed outcome and a call counter.
    struct MockCleanup {
        succeed: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockCleanup {
        fn new(succeed: bool) -> Self {
            Self {
                succeed: AtomicBool::new(succeed),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl FileCleanup for &MockCleanup {
        async fn delete_file(&self, _url: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed.load(Ordering::SeqCst)
        }
    }

    fn record(id: i64, business_area: &str, file: Option<FileRef>) -> Record {
        let now = Utc::now();
        Record {
            id,
            business_area: business_area.to_string(),
            title: "Supplier onboarding".to_string(),
            description: None,
            status: "active".to_string(),
            details: serde_json::json!({}),
            version: file.as_ref().map(|_| "1.0".to_string()),
            file,
            created_by: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }

    fn file_ref(url: &str) -> FileRef {
        FileRef {
            url: url.to_string(),
            name: Some("plan.pdf".to_string()),
            size: Some(2048),
            file_type: Some("application/pdf".to_string()),
        }
    }

    fn finance_scope() -> AccessScope {
        AccessScope::new(["Finance".to_string()])
    }

    #[tokio::test]
    async fn test_soft_delete_sets_both_deletion_fields() {
        let store = MockStore::new([record(1, "Finance", None)]);
        let cleanup = MockCleanup::new(true);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        let outcome = engine
            .soft_delete(RecordKind::BusinessProcess, 1, &finance_scope(), 7)
            .await
            .unwrap();

        assert!(outcome.record.deleted_at.is_some());
        assert_eq!(outcome.record.deleted_by, Some(7));
        assert!(outcome.file_cleanup_success);
        // No file on the record: cleanup is not attempted.
        assert_eq!(cleanup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_soft_delete_is_not_found() {
        let store = MockStore::new([record(1, "Finance", None)]);
        let cleanup = MockCleanup::new(true);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        engine
            .soft_delete(RecordKind::BusinessProcess, 1, &finance_scope(), 7)
            .await
            .unwrap();

        let err = engine
            .soft_delete(RecordKind::BusinessProcess, 1, &finance_scope(), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFoundOrForbidden));
    }

    #[tokio::test]
    async fn test_out_of_scope_record_is_not_found() {
        // Caller scoped to Finance, record lives in HR: 404 either way.
        let store = MockStore::new([record(1, "HR", None)]);
        let cleanup = MockCleanup::new(true);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        let err = engine
            .soft_delete(RecordKind::RiskMatrixEntry, 1, &finance_scope(), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFoundOrForbidden));
        assert!(store.audits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let store = MockStore::new([]);
        let cleanup = MockCleanup::new(true);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        let err = engine
            .soft_delete(RecordKind::RiskMatrixEntry, 99, &finance_scope(), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFoundOrForbidden));
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_fail_delete() {
        let store = MockStore::new([record(1, "Finance", Some(file_ref("areas/finance/a.pdf")))]);
        let cleanup = MockCleanup::new(false);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        let outcome = engine
            .soft_delete(RecordKind::BusinessProcess, 1, &finance_scope(), 7)
            .await
            .unwrap();

        assert!(!outcome.file_cleanup_success);
        assert!(outcome.record.deleted_at.is_some());
        assert!(!outcome.audit.file_cleanup_success);
        assert_eq!(cleanup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exactly_one_audit_entry_per_delete() {
        let store = MockStore::new([record(1, "Finance", Some(file_ref("areas/finance/a.pdf")))]);
        let cleanup = MockCleanup::new(true);
        let engine = SoftDeleteEngine::new(&store, &cleanup);

        let outcome = engine
            .soft_delete(RecordKind::QualityObjective, 1, &finance_scope(), 7)
            .await
            .unwrap();

        let audits = store.audits.lock().unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].table_name, "quality_objectives");
        assert_eq!(audits[0].record_id, 1);
        assert_eq!(audits[0].deleted_by, 7);
        assert_eq!(audits[0].business_area.as_deref(), Some("Finance"));
        assert_eq!(audits[0].file_name.as_deref(), Some("plan.pdf"));
        assert!(audits[0].file_cleanup_success);
        assert_eq!(outcome.audit.id, audits[0].id);
    }
}
