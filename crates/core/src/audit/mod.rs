//! Audit trail types and recorder contract.
//!
//! Every soft delete appends exactly one audit entry capturing who deleted
//! what, when, and whether the attached file was cleaned up. The trail is
//! append-only: no update or delete operations exist anywhere in the system.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::RecordError;

/// An audit entry waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDraft {
    /// Table the deleted record lives in.
    pub table_name: &'static str,
    /// ID of the deleted record.
    pub record_id: i64,
    /// When the record was soft-deleted.
    pub deleted_at: DateTime<Utc>,
    /// Who soft-deleted it.
    pub deleted_by: i64,
    /// Business area of the deleted record.
    pub business_area: Option<String>,
    /// Name of the attached file, if the record carried one.
    pub file_name: Option<String>,
    /// Whether blob cleanup of the attached file succeeded.
    pub file_cleanup_success: bool,
}

/// A persisted audit entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Audit entry ID.
    pub id: i64,
    /// Table the deleted record lives in.
    pub table_name: String,
    /// ID of the deleted record.
    pub record_id: i64,
    /// When the record was soft-deleted.
    pub deleted_at: DateTime<Utc>,
    /// Who soft-deleted it.
    pub deleted_by: i64,
    /// Business area of the deleted record.
    pub business_area: Option<String>,
    /// Name of the attached file, if the record carried one.
    pub file_name: Option<String>,
    /// Whether blob cleanup of the attached file succeeded.
    pub file_cleanup_success: bool,
    /// When the entry itself was written.
    pub created_at: DateTime<Utc>,
}

/// Append-only audit trail recorder.
///
/// A collaborator of the soft-delete engine, but independently invocable so
/// the trail can be written (and tested) on its own.
pub trait AuditRecorder: Send + Sync {
    /// Appends one audit entry.
    fn record(
        &self,
        draft: AuditDraft,
    ) -> impl std::future::Future<Output = Result<AuditEntry, RecordError>> + Send;
}
