//! Freshness decisions for incremental sync
//!
//! Pure functions that can be tested without network dependencies.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::models::Candidate;
use crate::storage::files;

/// The part of a baseline file the freshness check reads
#[derive(Deserialize)]
struct BaselineStamp {
    updated_at: Option<String>,
}

/// Parse an API timestamp with full time-of-day precision.
///
/// Accepts RFC 3339, zone-less date-times (taken as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Decide whether a remote timestamp supersedes the local one.
///
/// # Returns
/// `true` if there is no usable local timestamp, or the remote one is
/// strictly later. Equal timestamps do not count as newer. A remote
/// timestamp that cannot be parsed never replaces a valid local one.
pub fn is_newer(remote: Option<&str>, local: Option<&str>) -> bool {
    let Some(local) = local.and_then(parse_timestamp) else {
        return true;
    };
    match remote.and_then(parse_timestamp) {
        Some(remote) => remote > local,
        None => false,
    }
}

/// Read the `updated_at` of a record's baseline file, if there is a valid one
pub fn baseline_updated_at(record_dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(record_dir.join(files::CANDIDATE_INDEX)).ok()?;
    let stamp: BaselineStamp = serde_json::from_str(&content).ok()?;
    stamp.updated_at
}

/// Whether `candidate` must be written over the record in `record_dir`.
///
/// Missing, corrupt or timestamp-less baselines always need an update.
/// Performs no writes.
pub fn should_update(candidate: &Candidate, record_dir: &Path) -> bool {
    let local = baseline_updated_at(record_dir);
    is_newer(candidate.updated_at(), local.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const T0: &str = "2023-12-01T09:00:00Z";
    const T1: &str = "2023-12-01T10:00:00Z";
    const T2: &str = "2023-12-01T10:00:01Z";

    fn write_baseline(dir: &Path, content: &str) {
        fs::write(dir.join(files::CANDIDATE_INDEX), content).unwrap();
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = parse_timestamp("2024-01-02T00:00:00Z").unwrap();
        assert_eq!(parse_timestamp("2024-01-02T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_newer_is_strict() {
        assert!(is_newer(Some(T2), Some(T1)));
        assert!(!is_newer(Some(T1), Some(T1)));
        assert!(!is_newer(Some(T0), Some(T1)));
    }

    #[test]
    fn test_compares_time_of_day() {
        // Same date, one second apart
        assert!(is_newer(Some(T2), Some(T1)));
    }

    #[test]
    fn test_equal_instants_in_different_zones() {
        assert!(!is_newer(Some("2023-12-01T12:00:00+02:00"), Some(T1)));
    }

    #[test]
    fn test_missing_local_always_updates() {
        assert!(is_newer(Some(T0), None));
        assert!(is_newer(None, None));
        assert!(is_newer(Some(T0), Some("garbage")));
    }

    #[test]
    fn test_unparseable_remote_keeps_local() {
        assert!(!is_newer(Some("garbage"), Some(T1)));
        assert!(!is_newer(None, Some(T1)));
    }

    #[test]
    fn test_should_update_without_baseline() {
        let dir = tempdir().unwrap();
        let candidate = Candidate::new("c1").with_updated_at(T0);
        assert!(should_update(&candidate, dir.path()));
    }

    #[test]
    fn test_should_update_with_corrupt_baseline() {
        let dir = tempdir().unwrap();
        let candidate = Candidate::new("c1").with_updated_at(T0);

        write_baseline(dir.path(), "{ not json");
        assert!(should_update(&candidate, dir.path()));

        write_baseline(dir.path(), r#"{ "id": "c1" }"#);
        assert!(should_update(&candidate, dir.path()));

        write_baseline(dir.path(), r#"{ "id": "c1", "updated_at": 12 }"#);
        assert!(should_update(&candidate, dir.path()));
    }

    #[test]
    fn test_should_update_compares_baseline() {
        let dir = tempdir().unwrap();
        write_baseline(dir.path(), &format!(r#"{{ "id": "c1", "updated_at": "{}" }}"#, T1));

        assert!(should_update(&Candidate::new("c1").with_updated_at(T2), dir.path()));
        assert!(!should_update(&Candidate::new("c1").with_updated_at(T1), dir.path()));
        assert!(!should_update(&Candidate::new("c1").with_updated_at(T0), dir.path()));

        // Deciding never touches the record
        let content = fs::read_to_string(dir.path().join(files::CANDIDATE_INDEX)).unwrap();
        assert!(content.contains(T1));
    }
}
