//! Core state and derivation logic for Taskfolio.
//! This crate is the single source of truth for session and task invariants.

pub mod app;
pub mod clock;
pub mod config;
pub mod latency;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod state;
pub mod storage;
pub mod view;

pub use app::{AppInitError, ConfiguredTaskfolio, Taskfolio};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ConfigError, CoreConfig, LatencyConfig, LoggingConfig, StorageBackend, StorageConfig,
};
pub use latency::{Latency, LatencyKind, NoLatency, SimulatedLatency};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::task::{
    Task, TaskFilter, TaskId, TaskInput, TaskPatch, TaskStatus, TaskValidationError,
};
pub use model::user::{CredentialRecord, UserProfile};
pub use notify::{LogSink, Notification, NotificationLevel, NotificationSink, RecordingSink};
pub use repo::credential_repo::{CredentialRepository, InMemoryCredentialRepository};
pub use service::auth_service::{AuthError, SessionManager};
pub use service::task_service::{seed_tasks, TaskError, TaskStore};
pub use state::session::{SessionEvent, SessionPhase, SessionState};
pub use state::tasks::{TaskAction, TaskState};
pub use storage::{
    tasks_key, JsonRead, KeyValueStore, KvBackend, MemoryKvStore, SqliteKvStore, StorageError,
    StorageResult, SESSION_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
