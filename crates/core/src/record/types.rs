//! Record domain types.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The eight QMS record kinds.
///
/// Each kind is backed by its own table plus a structurally identical
/// version-history table; both names are resolved here at compile time, so
/// an unknown kind is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Business process definition.
    BusinessProcess,
    /// Risk register entry.
    RiskMatrixEntry,
    /// Quality objective.
    QualityObjective,
    /// Performance monitoring control.
    PerformanceMonitoringControl,
    /// Training session record.
    TrainingSession,
    /// Third-party evaluation.
    ThirdPartyEvaluation,
    /// Customer feedback system.
    CustomerFeedbackSystem,
    /// QMS assessment.
    QmsAssessment,
}

impl RecordKind {
    /// All record kinds, in stable order.
    pub const ALL: [Self; 8] = [
        Self::BusinessProcess,
        Self::RiskMatrixEntry,
        Self::QualityObjective,
        Self::PerformanceMonitoringControl,
        Self::TrainingSession,
        Self::ThirdPartyEvaluation,
        Self::CustomerFeedbackSystem,
        Self::QmsAssessment,
    ];

    /// The backing table name.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::BusinessProcess => "processes",
            Self::RiskMatrixEntry => "risk_matrix",
            Self::QualityObjective => "quality_objectives",
            Self::PerformanceMonitoringControl => "monitoring_controls",
            Self::TrainingSession => "training_sessions",
            Self::ThirdPartyEvaluation => "third_party_evaluations",
            Self::CustomerFeedbackSystem => "feedback_systems",
            Self::QmsAssessment => "qms_assessments",
        }
    }

    /// The parallel version-history table name.
    #[must_use]
    pub const fn version_table_name(self) -> &'static str {
        match self {
            Self::BusinessProcess => "process_versions",
            Self::RiskMatrixEntry => "risk_matrix_versions",
            Self::QualityObjective => "quality_objective_versions",
            Self::PerformanceMonitoringControl => "monitoring_control_versions",
            Self::TrainingSession => "training_session_versions",
            Self::ThirdPartyEvaluation => "third_party_evaluation_versions",
            Self::CustomerFeedbackSystem => "feedback_system_versions",
            Self::QmsAssessment => "qms_assessment_versions",
        }
    }

    /// The URL resource segment for this kind.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::BusinessProcess => "processes",
            Self::RiskMatrixEntry => "risk-matrix",
            Self::QualityObjective => "quality-objectives",
            Self::PerformanceMonitoringControl => "monitoring-controls",
            Self::TrainingSession => "training-sessions",
            Self::ThirdPartyEvaluation => "third-party-evaluations",
            Self::CustomerFeedbackSystem => "feedback-systems",
            Self::QmsAssessment => "qms-assessments",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Reference to a record's attached file.
///
/// A record carries a file iff it has a `url`; the remaining metadata fields
/// are best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Blob storage key/url of the file.
    #[serde(rename = "file_url")]
    pub url: String,
    /// Original filename.
    #[serde(rename = "file_name")]
    pub name: Option<String>,
    /// File size in bytes.
    #[serde(rename = "file_size")]
    pub size: Option<i64>,
    /// MIME type.
    pub file_type: Option<String>,
}

/// A QMS record, independent of which table backs it.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Record ID.
    pub id: i64,
    /// Owning business area name.
    pub business_area: String,
    /// Record title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Lifecycle status (domain-specific, e.g. "active", "under_review").
    pub status: String,
    /// Entity-specific fields.
    pub details: serde_json::Value,
    /// Attached file reference, if any; serialized flat as
    /// `file_url`/`file_name`/`file_size`/`file_type`.
    #[serde(flatten)]
    pub file: Option<FileRef>,
    /// Current file version label (e.g. "1.0").
    pub version: Option<String>,
    /// Creating user ID.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp; set together with `deleted_by` or not at all.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Soft-deleting user ID; set together with `deleted_at` or not at all.
    pub deleted_by: Option<i64>,
}

impl Record {
    /// Returns true if the record has not been soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Input for creating a record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Target business area.
    pub business_area: String,
    /// Record title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Entity-specific fields.
    pub details: serde_json::Value,
    /// Initial attached file, if uploaded at creation time.
    pub file: Option<FileRef>,
}

/// Input for updating a record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecord {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New entity-specific fields.
    pub details: Option<serde_json::Value>,
    /// Replacement file reference; triggers a version snapshot when the url
    /// differs from the current one.
    pub file: Option<FileRef>,
}

/// The set of business areas a caller may access.
///
/// An empty scope means "no access at all" (e.g. the user row was removed);
/// callers must reject it as unauthorized rather than treat it as a filter
/// matching nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessScope(HashSet<String>);

impl AccessScope {
    /// Creates a scope from business area names.
    #[must_use]
    pub fn new(areas: impl IntoIterator<Item = String>) -> Self {
        Self(areas.into_iter().collect())
    }

    /// Returns true if the scope grants access to the given business area.
    #[must_use]
    pub fn contains(&self, business_area: &str) -> bool {
        self.0.contains(business_area)
    }

    /// Returns true if the scope grants access to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the accessible business area names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of accessible business areas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> IntoIterator for &'a AccessScope {
    type Item = &'a String;
    type IntoIter = std::collections::hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tables_are_distinct() {
        let tables: HashSet<_> = RecordKind::ALL.iter().map(|k| k.table_name()).collect();
        let versions: HashSet<_> = RecordKind::ALL
            .iter()
            .map(|k| k.version_table_name())
            .collect();
        assert_eq!(tables.len(), RecordKind::ALL.len());
        assert_eq!(versions.len(), RecordKind::ALL.len());
        assert!(tables.is_disjoint(&versions));
    }

    #[test]
    fn test_access_scope_contains() {
        let scope = AccessScope::new(["Finance".to_string(), "HR".to_string()]);
        assert!(scope.contains("Finance"));
        assert!(!scope.contains("Quality Management"));
        assert!(!scope.is_empty());
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn test_empty_scope() {
        let scope = AccessScope::default();
        assert!(scope.is_empty());
        assert!(!scope.contains("Finance"));
    }
}
