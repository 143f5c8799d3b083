// crates/todo_tracker/tests/store.rs

use std::fs;

use tempfile::tempdir;
use todo_marker::FoundTodo;
use todo_tracker::{
    load_tracker, reconcile, save_tracker, StoreError, StoreLoadPolicy, TodoItem, TodoTracker,
};

fn item(tag: &str, description: &str, file: &str, line: usize, date: &str) -> TodoItem {
    TodoItem {
        tag: tag.into(),
        description: description.into(),
        file: file.into(),
        line,
        date: date.into(),
    }
}

fn found(tag: &str, description: &str, file: &str, line: usize) -> FoundTodo {
    FoundTodo {
        tag: tag.into(),
        description: description.into(),
        file: file.into(),
        line,
    }
}

#[test]
fn test_missing_store_is_empty_under_either_policy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");

    for policy in [StoreLoadPolicy::Reset, StoreLoadPolicy::Fail] {
        let tracker = load_tracker(&path, policy).expect("missing store is not an error");
        assert!(tracker.is_empty());
    }
}

#[test]
fn test_malformed_store_resets_by_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::write(&path, "{\"todos\": [ {\"tag\": ").unwrap();

    let tracker = load_tracker(&path, StoreLoadPolicy::Reset).unwrap();
    assert!(tracker.is_empty());
}

#[test]
fn test_malformed_store_fails_when_asked() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::write(&path, "not json").unwrap();

    let err = load_tracker(&path, StoreLoadPolicy::Fail).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "unexpected error: {err}");
}

#[test]
fn test_directory_in_place_of_store_follows_policy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::create_dir(&path).unwrap();

    assert!(load_tracker(&path, StoreLoadPolicy::Reset).unwrap().is_empty());
    assert!(load_tracker(&path, StoreLoadPolicy::Fail).is_err());
}

#[test]
fn test_legacy_null_todos_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::write(&path, "{\n  \"todos\": null\n}\n").unwrap();

    let tracker = load_tracker(&path, StoreLoadPolicy::Fail).unwrap();
    assert!(tracker.is_empty());
}

#[test]
fn test_save_writes_two_space_pretty_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    let tracker = TodoTracker::new(vec![item("fix", "x", "a.go", 3, "2024-01-01")]);

    save_tracker(&path, &tracker).unwrap();

    let expected = r#"{
  "todos": [
    {
      "tag": "fix",
      "description": "x",
      "file": "a.go",
      "line": 3,
      "date": "2024-01-01"
    }
  ]
}
"#;
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_save_empty_tracker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");

    save_tracker(&path, &TodoTracker::default()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"todos\": []\n}\n");
}

#[test]
fn test_save_overwrites_in_full_and_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::write(&path, "x".repeat(4096)).unwrap();

    let tracker = TodoTracker::new(vec![item("a", "b", "c", 1, "2024-01-01")]);
    save_tracker(&path, &tracker).unwrap();

    assert_eq!(load_tracker(&path, StoreLoadPolicy::Fail).unwrap(), tracker);
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_save_creates_missing_parent_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("todo_tracker.json");

    save_tracker(&path, &TodoTracker::default()).unwrap();
    assert!(path.exists());
}

#[test]
fn test_save_into_unwritable_location_fails() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    // A regular file cannot act as a parent directory.
    let path = blocker.join("todo_tracker.json");

    let err = save_tracker(&path, &TodoTracker::default()).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }), "unexpected error: {err}");
}

#[test]
fn test_reconcile_against_saved_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    fs::write(
        &path,
        r#"{"todos":[{"tag":"fix","description":"x","file":"a.go","line":3,"date":"2024-01-01"}]}"#,
    )
    .unwrap();

    let old = load_tracker(&path, StoreLoadPolicy::Fail).unwrap();
    let merged = reconcile(
        &old.todos,
        vec![found("fix", "x", "a.go", 3), found("idea", "y", "b.go", 5)],
        "2026-10-16",
    );
    save_tracker(&path, &TodoTracker::new(merged.todos.clone())).unwrap();

    assert_eq!(
        merged.todos,
        vec![
            item("fix", "x", "a.go", 3, "2024-01-01"),
            item("idea", "y", "b.go", 5, "2026-10-16"),
        ]
    );

    // A second run over the same scan changes nothing on disk.
    let first = fs::read(&path).unwrap();
    let reloaded = load_tracker(&path, StoreLoadPolicy::Fail).unwrap();
    let again = reconcile(
        &reloaded.todos,
        vec![found("fix", "x", "a.go", 3), found("idea", "y", "b.go", 5)],
        "2026-10-16",
    );
    save_tracker(&path, &TodoTracker::new(again.todos)).unwrap();
    assert_eq!(fs::read(&path).unwrap(), first);
}

#[cfg(unix)]
#[test]
fn test_save_keeps_existing_mode_and_defaults_new_store_to_0644() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("todo_tracker.json");
    let tracker = TodoTracker::new(vec![item("fix", "x", "a.go", 3, "2024-01-01")]);
    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;

    save_tracker(&path, &tracker).unwrap();
    assert_eq!(mode(&path), 0o644);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
    save_tracker(&path, &tracker).unwrap();
    assert_eq!(mode(&path), 0o640);
}
