use chrono::{TimeZone, Utc};
use taskfolio_core::{
    tasks_key, ConfiguredTaskfolio, CoreConfig, FixedClock, InMemoryCredentialRepository,
    KeyValueStore, LatencyConfig, MemoryKvStore, NoLatency, RecordingSink, StorageBackend,
    StorageConfig, TaskError, TaskFilter, TaskInput, TaskPatch, TaskStatus, Taskfolio,
    SESSION_KEY,
};

type TestApp =
    Taskfolio<MemoryKvStore, InMemoryCredentialRepository, NoLatency, RecordingSink, FixedClock>;

fn app(store: &MemoryKvStore, sink: &RecordingSink) -> TestApp {
    Taskfolio::new(
        store.clone(),
        InMemoryCredentialRepository::with_demo_account(),
        NoLatency,
        sink.clone(),
        FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()),
    )
}

#[tokio::test]
async fn login_loads_seed_and_logout_clears() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut app = app(&store, &sink);

    assert!(app.restore().is_none());
    assert!(app.tasks().list().is_empty());

    app.login("demo@example.com", "password123").await.unwrap();
    assert_eq!(app.tasks().user(), app.current_user());
    assert_eq!(app.tasks().list().len(), 3);
    assert!(!app.tasks().is_loading());

    app.logout();
    assert!(app.current_user().is_none());
    assert!(app.tasks().user().is_none());
    assert!(app.tasks().list().is_empty());
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    assert!(store.get(&tasks_key("1")).unwrap().is_some());
}

#[tokio::test]
async fn failed_login_keeps_tasks_unloaded() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut app = app(&store, &sink);
    app.restore();

    assert!(app.login("demo@example.com", "nope").await.is_err());
    assert!(app.tasks().user().is_none());
    assert!(store.get(&tasks_key("1")).unwrap().is_none());
}

#[tokio::test]
async fn relogin_and_restart_keep_persisted_tasks() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut first = app(&store, &sink);
    first.restore();
    first.login("demo@example.com", "password123").await.unwrap();
    let added = first.add_task(TaskInput::new("Persist me")).await.unwrap();

    first.logout();
    first.login("demo@example.com", "password123").await.unwrap();
    assert_eq!(first.tasks().list().len(), 4);
    assert!(first.tasks().get(&added.id).is_some());

    let mut restarted = app(&store, &sink);
    let restored = restarted.restore().cloned().unwrap();
    assert_eq!(restored.id, "1");
    assert_eq!(restarted.tasks().list(), first.tasks().list());
}

#[tokio::test]
async fn registered_user_starts_with_own_seed() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut app = app(&store, &sink);
    app.restore();

    let profile = app
        .register("Ada", "ada@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(profile.id, "2");
    assert_eq!(app.tasks().list().len(), 3);
    assert!(app.tasks().list().iter().all(|t| t.user_id == "2"));
}

#[tokio::test]
async fn configured_app_uses_sqlite_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        latency: LatencyConfig::instant(),
        storage: StorageConfig {
            backend: StorageBackend::Sqlite,
            path: dir.path().join("app.sqlite3").to_string_lossy().into_owned(),
        },
        ..CoreConfig::default()
    };

    {
        let mut app = ConfiguredTaskfolio::from_config(&config, RecordingSink::new()).unwrap();
        assert!(app.current_user().is_none());
        app.login("demo@example.com", "password123").await.unwrap();
        app.add_task(TaskInput::new("durable")).await.unwrap();
    }

    let reopened = ConfiguredTaskfolio::from_config(&config, RecordingSink::new()).unwrap();
    assert_eq!(reopened.current_user().map(|u| u.id.as_str()), Some("1"));
    assert!(reopened
        .tasks()
        .list()
        .iter()
        .any(|task| task.title == "durable"));
}

#[test]
fn configured_sqlite_without_path_is_rejected() {
    let config = CoreConfig {
        storage: StorageConfig {
            backend: StorageBackend::Sqlite,
            path: String::new(),
        },
        ..CoreConfig::default()
    };
    assert!(ConfiguredTaskfolio::from_config(&config, RecordingSink::new()).is_err());
}

#[tokio::test]
async fn task_mutations_after_logout_are_rejected() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut app = app(&store, &sink);
    app.restore();
    app.login("demo@example.com", "password123").await.unwrap();
    let created = app.add_task(TaskInput::new("mine")).await.unwrap();
    assert_eq!(created.user_id, "1");
    assert_eq!(app.tasks().user(), app.current_user());

    app.logout();

    let err = app.add_task(TaskInput::new("orphan")).await.unwrap_err();
    assert!(matches!(err, TaskError::NotAuthenticated));
    assert!(matches!(
        app.toggle_task(&created.id).await.unwrap_err(),
        TaskError::NotAuthenticated
    ));
    assert!(app.tasks().list().is_empty());
    assert_eq!(
        sink.last().and_then(|n| n.detail),
        Some("You need to be logged in to update tasks.".to_string())
    );

    let persisted: Vec<taskfolio_core::Task> =
        serde_json::from_str(&store.get(&tasks_key("1")).unwrap().unwrap()).unwrap();
    assert!(persisted.iter().all(|task| task.title != "orphan"));
}

#[tokio::test]
async fn facade_forwards_edits_to_the_signed_in_store() {
    let store = MemoryKvStore::new();
    let sink = RecordingSink::new();
    let mut app = app(&store, &sink);
    app.restore();
    app.login("demo@example.com", "password123").await.unwrap();

    let updated = app
        .update_task("2", TaskPatch::status(TaskStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);

    app.set_filter(TaskFilter::InProgress);
    assert_eq!(app.tasks().visible().len(), 2);

    let removed = app.delete_task("3").await.unwrap();
    assert_eq!(removed.title, "Update dependencies");
    assert_eq!(app.tasks().list().len(), 2);
}
