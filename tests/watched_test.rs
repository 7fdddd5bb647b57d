//! Watched list persistence tests
//!
//! Runs the watched list against real files in a temp directory: restarts,
//! corrupt data, duplicates and the derived statistics.

use popcorn::models::{WatchedEntry, WatchedStats};
use popcorn::storage::{FileStorage, Storage};
use popcorn::watched::{WatchedError, WatchedList, WATCHED_KEY};
use tempfile::TempDir;

fn entry(id: &str, imdb: f64, user: u8, runtime: u32) -> WatchedEntry {
    WatchedEntry {
        id: id.to_string(),
        title: format!("Movie {}", id),
        year: "2010".into(),
        poster_url: String::new(),
        imdb_rating: imdb,
        runtime_minutes: runtime,
        user_rating: user,
        rating_decision_count: 1,
    }
}

fn open(dir: &TempDir) -> WatchedList {
    WatchedList::hydrate(Box::new(FileStorage::in_dir(dir.path())))
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_fresh_directory_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let list = open(&dir);

    assert!(list.is_empty());
    assert_eq!(list.stats(), WatchedStats::default());
}

#[test]
fn test_entries_survive_restart_in_order() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut list = open(&dir);
        list.append(entry("tt1375666", 8.8, 9, 148)).unwrap();
        list.append(entry("tt0133093", 8.7, 10, 136)).unwrap();
    }

    let list = open(&dir);
    let ids: Vec<&str> = list.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["tt1375666", "tt0133093"]);
    assert_eq!(list.user_rating_for("tt0133093"), Some(10));
}

#[test]
fn test_removal_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut list = open(&dir);
        list.append(entry("a", 7.0, 7, 100)).unwrap();
        list.append(entry("b", 8.0, 8, 110)).unwrap();
        list.remove("a").unwrap();
    }

    let list = open(&dir);
    assert_eq!(list.len(), 1);
    assert!(!list.contains("a"));
    assert!(list.contains("b"));
}

#[test]
fn test_snapshot_uses_camel_case_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = open(&dir);
    list.append(entry("tt1375666", 8.8, 9, 148)).unwrap();

    let raw = FileStorage::in_dir(dir.path())
        .get(WATCHED_KEY)
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json[0]["imdbRating"], 8.8);
    assert_eq!(json[0]["userRating"], 9);
    assert_eq!(json[0]["runtimeMinutes"], 148);
    assert_eq!(json[0]["ratingDecisionCount"], 1);
}

#[test]
fn test_corrupt_file_hydrates_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::in_dir(dir.path());
    std::fs::write(storage.path(), "{ not json").unwrap();

    let mut list = open(&dir);
    assert!(list.is_empty());

    list.append(entry("a", 7.0, 7, 100)).unwrap();
    assert_eq!(open(&dir).len(), 1);
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_duplicate_is_rejected_and_first_entry_kept() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = open(&dir);
    list.append(entry("a", 7.0, 7, 100)).unwrap();

    let err = list.append(entry("a", 9.0, 3, 90)).unwrap_err();
    assert!(matches!(err, WatchedError::Duplicate(ref id) if id == "a"));

    let list = open(&dir);
    assert_eq!(list.len(), 1);
    assert_eq!(list.user_rating_for("a"), Some(7));
}

#[test]
fn test_unrated_entry_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = open(&dir);

    let err = list.append(entry("a", 7.0, 0, 100)).unwrap_err();
    assert!(matches!(err, WatchedError::InvalidRating(0)));
    assert!(open(&dir).is_empty());
}

#[test]
fn test_stats_are_averages() {
    let dir = tempfile::tempdir().unwrap();
    let mut list = open(&dir);
    list.append(entry("a", 8.0, 9, 120)).unwrap();
    list.append(entry("b", 6.0, 7, 100)).unwrap();

    let stats = list.stats();
    assert_eq!(stats.count, 2);
    assert!((stats.avg_imdb_rating - 7.0).abs() < 1e-9);
    assert!((stats.avg_user_rating - 8.0).abs() < 1e-9);
    assert!((stats.avg_runtime - 110.0).abs() < 1e-9);

    list.remove("a").unwrap();
    list.remove("b").unwrap();
    assert_eq!(list.stats(), WatchedStats::default());
}
