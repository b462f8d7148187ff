//! File version labels and snapshot-before-replace tracking.
//!
//! Before a record's attached file is overwritten, the outgoing file's
//! metadata is snapshotted into that record kind's version-history table and
//! the record receives the next version label.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::{FileRef, RecordError};

/// Computes the next version label.
///
/// Rules:
/// - `"major.minor"` (both integers) → `"major.(minor+1)"`
/// - bare integer `"N"` → `"(N+1).0"`
/// - empty → `"1.0"`
/// - anything else → `"{current}.1"`
#[must_use]
pub fn increment_version(current: &str) -> String {
    if current.is_empty() {
        return "1.0".to_string();
    }

    let parts: Vec<&str> = current.split('.').collect();
    match parts.as_slice() {
        [major, minor] => {
            if major.parse::<u64>().is_ok()
                && let Some(bumped) = minor.parse::<u64>().ok().and_then(|m| m.checked_add(1))
            {
                return format!("{major}.{bumped}");
            }
        }
        [single] => {
            if let Some(next) = single.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
                return format!("{next}.0");
            }
        }
        _ => {}
    }

    format!("{current}.1")
}

/// A superseded file's metadata, to be written into a version-history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVersionSnapshot {
    /// The record whose file is being replaced.
    pub record_id: i64,
    /// Version label the outgoing file carried.
    pub version_label: String,
    /// Blob storage key/url of the outgoing file.
    pub file_url: String,
    /// Original filename of the outgoing file.
    pub file_name: Option<String>,
    /// Size of the outgoing file in bytes.
    pub file_size: Option<i64>,
    /// MIME type of the outgoing file.
    pub file_type: Option<String>,
    /// User performing the replacement.
    pub uploaded_by: i64,
}

/// A persisted version-history row.
#[derive(Debug, Clone, Serialize)]
pub struct FileVersionEntry {
    /// Version-history row ID.
    pub id: i64,
    /// The record this version belongs to.
    pub record_id: i64,
    /// Version label the file carried while current.
    pub version_label: String,
    /// Blob storage key/url.
    pub file_url: String,
    /// Original filename.
    pub file_name: Option<String>,
    /// File size in bytes.
    pub file_size: Option<i64>,
    /// MIME type.
    pub file_type: Option<String>,
    /// User who superseded this file.
    pub uploaded_by: i64,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

/// Persistence contract for one record kind's version-history table.
pub trait VersionHistoryRepository: Send + Sync {
    /// Inserts one snapshot row.
    fn insert_snapshot(
        &self,
        snapshot: FileVersionSnapshot,
    ) -> impl std::future::Future<Output = Result<(), RecordError>> + Send;
}

/// Decides whether replacing the attached file warrants a snapshot.
///
/// Returns the snapshot to write plus the bumped version label, or `None`
/// when no snapshot is due: the new url is absent, matches the current one,
/// or there is no current url/version to preserve (first-ever upload).
#[must_use]
pub fn plan_file_replacement(
    record_id: i64,
    current_file: Option<&FileRef>,
    current_version: Option<&str>,
    new_file_url: Option<&str>,
    uploaded_by: i64,
) -> Option<(FileVersionSnapshot, String)> {
    let new_url = new_file_url?;
    let current = current_file?;
    let version = current_version?;

    if current.url == new_url {
        return None;
    }

    let snapshot = FileVersionSnapshot {
        record_id,
        version_label: version.to_string(),
        file_url: current.url.clone(),
        file_name: current.name.clone(),
        file_size: current.size,
        file_type: current.file_type.clone(),
        uploaded_by,
    };

    Some((snapshot, increment_version(version)))
}

/// File version tracker bound to one record kind's version table.
pub struct FileVersionTracker<R> {
    repo: R,
}

impl<R: VersionHistoryRepository> FileVersionTracker<R> {
    /// Creates a tracker writing through the given repository.
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Snapshots the current file and returns the bumped version label, or
    /// `None` (label unchanged, nothing written) when no snapshot is due.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot insert fails.
    pub async fn maybe_snapshot_and_bump(
        &self,
        record_id: i64,
        current_file: Option<&FileRef>,
        current_version: Option<&str>,
        new_file_url: Option<&str>,
        uploaded_by: i64,
    ) -> Result<Option<String>, RecordError> {
        let Some((snapshot, new_label)) = plan_file_replacement(
            record_id,
            current_file,
            current_version,
            new_file_url,
            uploaded_by,
        ) else {
            return Ok(None);
        };

        self.repo.insert_snapshot(snapshot).await?;
        Ok(Some(new_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    #[rstest]
    #[case("1.0", "1.1")]
    #[case("2.5", "2.6")]
    #[case("10.99", "10.100")]
    #[case("1", "2.0")]
    #[case("7", "8.0")]
    #[case("", "1.0")]
    #[case("abc", "abc.1")]
    #[case("1.2.3", "1.2.3.1")]
    #[case("v2", "v2.1")]
    #[case("1.x", "1.x.1")]
    // Components at u64::MAX fall through to the suffix rule instead of
    // overflowing.
    #[case("1.18446744073709551615", "1.18446744073709551615.1")]
    #[case("18446744073709551615", "18446744073709551615.1")]
    fn test_increment_version(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(increment_version(input), expected);
    }

    fn file_ref(url: &str) -> FileRef {
        FileRef {
            url: url.to_string(),
            name: Some("manual.pdf".to_string()),
            size: Some(1024),
            file_type: Some("application/pdf".to_string()),
        }
    }

    #[test]
    fn test_no_plan_without_new_url() {
        let current = file_ref("areas/finance/a.pdf");
        assert!(plan_file_replacement(1, Some(&current), Some("1.0"), None, 9).is_none());
    }

    #[test]
    fn test_no_plan_when_url_unchanged() {
        let current = file_ref("areas/finance/a.pdf");
        assert!(
            plan_file_replacement(1, Some(&current), Some("1.0"), Some("areas/finance/a.pdf"), 9)
                .is_none()
        );
    }

    #[test]
    fn test_no_plan_on_first_upload() {
        // No current file and no current version: zero history rows.
        assert!(plan_file_replacement(1, None, None, Some("areas/finance/b.pdf"), 9).is_none());
    }

    #[test]
    fn test_no_plan_without_current_version() {
        let current = file_ref("areas/finance/a.pdf");
        assert!(
            plan_file_replacement(1, Some(&current), None, Some("areas/finance/b.pdf"), 9)
                .is_none()
        );
    }

    #[test]
    fn test_plan_snapshots_outgoing_file() {
        let current = file_ref("areas/finance/a.pdf");
        let (snapshot, label) =
            plan_file_replacement(42, Some(&current), Some("1.0"), Some("areas/finance/b.pdf"), 9)
                .expect("snapshot due");

        assert_eq!(snapshot.record_id, 42);
        assert_eq!(snapshot.version_label, "1.0");
        assert_eq!(snapshot.file_url, "areas/finance/a.pdf");
        assert_eq!(snapshot.file_name.as_deref(), Some("manual.pdf"));
        assert_eq!(snapshot.uploaded_by, 9);
        assert_eq!(label, "1.1");
    }

    /// In-memory repository capturing inserted snapshots.
    #[derive(Default)]
    struct MockVersionRepo {
        snapshots: Mutex<Vec<FileVersionSnapshot>>,
    }

    impl VersionHistoryRepository for &MockVersionRepo {
        async fn insert_snapshot(
            &self,
            snapshot: FileVersionSnapshot,
        ) -> Result<(), RecordError> {
            self.snapshots.lock().unwrap().push(snapshot);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_tracker_writes_one_snapshot() {
        let repo = MockVersionRepo::default();
        let tracker = FileVersionTracker::new(&repo);
        let current = file_ref("areas/hr/old.pdf");

        let label = tracker
            .maybe_snapshot_and_bump(5, Some(&current), Some("2.3"), Some("areas/hr/new.pdf"), 1)
            .await
            .unwrap();

        assert_eq!(label.as_deref(), Some("2.4"));
        let snapshots = repo.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].file_url, "areas/hr/old.pdf");
    }

    #[tokio::test]
    async fn test_tracker_skips_first_upload() {
        let repo = MockVersionRepo::default();
        let tracker = FileVersionTracker::new(&repo);

        let label = tracker
            .maybe_snapshot_and_bump(5, None, None, Some("areas/hr/new.pdf"), 1)
            .await
            .unwrap();

        assert!(label.is_none());
        assert!(repo.snapshots.lock().unwrap().is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // major.minor labels bump the minor component only.
        #[test]
        fn prop_major_minor_bumps_minor(major in 0u32..10_000, minor in 0u32..10_000) {
            let label = format!("{major}.{minor}");
            prop_assert_eq!(increment_version(&label), format!("{major}.{}", minor + 1));
        }

        // Bare integers restart the minor component at zero.
        #[test]
        fn prop_bare_integer_becomes_major(n in 0u32..10_000) {
            prop_assert_eq!(increment_version(&n.to_string()), format!("{}.0", n + 1));
        }

        // The bumped label never equals its input.
        #[test]
        fn prop_label_strictly_changes(label in ".{0,24}") {
            prop_assert_ne!(increment_version(&label), label);
        }
    }
}
