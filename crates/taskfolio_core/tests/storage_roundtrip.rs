use rusqlite::Connection;
use taskfolio_core::storage::{read_json, write_json};
use taskfolio_core::{
    seed_tasks, tasks_key, JsonRead, KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError,
    Task, UserProfile, SESSION_KEY,
};

fn reload(store: &impl KeyValueStore, key: &str) -> Vec<Task> {
    match read_json::<Vec<Task>>(store, key).unwrap() {
        JsonRead::Parsed(tasks) => tasks,
        other => panic!("expected parsed tasks, got {other:?}"),
    }
}

#[test]
fn task_collection_survives_persist_and_reload() {
    let store = MemoryKvStore::new();
    let mut tasks = seed_tasks("1");
    tasks[1].due_date = None;
    tasks[2].description = "quotes \" and\nnewlines".to_string();

    write_json(&store, &tasks_key("1"), &tasks).unwrap();

    assert_eq!(reload(&store, &tasks_key("1")), tasks);
}

#[test]
fn persisted_task_uses_camel_case_wire_names() {
    let store = MemoryKvStore::new();
    write_json(&store, &tasks_key("1"), &seed_tasks("1")).unwrap();

    let raw = store.get(&tasks_key("1")).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json[0];
    assert_eq!(first["status"], "in-progress");
    assert_eq!(first["dueDate"], "2023-12-15");
    assert_eq!(first["userId"], "1");
    assert!(first["createdAt"].as_str().unwrap().starts_with("2023-11-28T10:30:00"));
}

#[test]
fn sqlite_store_keeps_values_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskfolio.sqlite3");
    let profile = UserProfile {
        id: "1".to_string(),
        name: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
    };

    {
        let store = SqliteKvStore::open(&path).unwrap();
        write_json(&store, SESSION_KEY, &profile).unwrap();
        write_json(&store, &tasks_key("1"), &seed_tasks("1")).unwrap();
    }

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert!(matches!(
        read_json::<UserProfile>(&reopened, SESSION_KEY).unwrap(),
        JsonRead::Parsed(ref restored) if restored == &profile
    ));
    assert_eq!(reload(&reopened, &tasks_key("1")), seed_tasks("1"));

    reopened.remove(SESSION_KEY).unwrap();
    reopened.remove(SESSION_KEY).unwrap();
    assert_eq!(reopened.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn sqlite_store_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    }

    let err = SqliteKvStore::open(&path).unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnsupportedSchemaVersion {
            db_version: 999,
            ..
        }
    ));
}
