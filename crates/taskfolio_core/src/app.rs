//! Application facade wiring the session manager to the task store.
//!
//! # Responsibility
//! - Share one key-value store between session and task state.
//! - Reload or clear the task store whenever the signed-in user changes.
//! - Forward task mutations; the task store is never handed out mutably, so
//!   its user can only change through a session operation.
//!
//! # Invariants
//! - After any session operation returns, `tasks().user()` equals
//!   `session().current_user()`.

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, CoreConfig};
use crate::latency::{Latency, SimulatedLatency};
use crate::model::task::{Task, TaskFilter, TaskInput, TaskPatch};
use crate::model::user::UserProfile;
use crate::notify::NotificationSink;
use crate::repo::credential_repo::{CredentialRepository, InMemoryCredentialRepository};
use crate::service::auth_service::{AuthError, SessionManager};
use crate::service::task_service::{TaskError, TaskStore};
use crate::storage::{KeyValueStore, KvBackend, StorageError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failures while building an app from configuration.
#[derive(Debug)]
pub enum AppInitError {
    Config(ConfigError),
    Storage(StorageError),
}

impl Display for AppInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppInitError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StorageError> for AppInitError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Session manager and task store bound to the same storage and notifier.
pub struct Taskfolio<S, C, L, N, K> {
    session: SessionManager<S, C, L, N>,
    tasks: TaskStore<S, L, N, K>,
}

/// App assembled from `CoreConfig`.
pub type ConfiguredTaskfolio<N> =
    Taskfolio<Arc<KvBackend>, InMemoryCredentialRepository, SimulatedLatency, N, SystemClock>;

impl<N> ConfiguredTaskfolio<N>
where
    N: NotificationSink + Clone,
{
    /// Opens the configured storage backend and restores any saved session.
    pub fn from_config(config: &CoreConfig, notifier: N) -> Result<Self, AppInitError> {
        config.validate()?;
        let store = Arc::new(config.storage.open()?);
        let mut app = Taskfolio::new(
            store,
            InMemoryCredentialRepository::with_demo_account(),
            SimulatedLatency::from_config(&config.latency),
            notifier,
            SystemClock,
        );
        app.restore();
        Ok(app)
    }
}

impl<S, C, L, N, K> Taskfolio<S, C, L, N, K>
where
    S: KeyValueStore + Clone,
    C: CredentialRepository,
    L: Latency + Clone,
    N: NotificationSink + Clone,
    K: Clock,
{
    /// Builds both halves; neither has touched storage yet.
    pub fn new(store: S, credentials: C, latency: L, notifier: N, clock: K) -> Self {
        Self {
            session: SessionManager::new(
                store.clone(),
                credentials,
                latency.clone(),
                notifier.clone(),
            ),
            tasks: TaskStore::new(store, latency, notifier, clock),
        }
    }

    pub fn session(&self) -> &SessionManager<S, C, L, N> {
        &self.session
    }

    pub fn tasks(&self) -> &TaskStore<S, L, N, K> {
        &self.tasks
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.current_user()
    }

    /// Restores the saved session and loads that user's tasks.
    pub fn restore(&mut self) -> Option<&UserProfile> {
        self.session.restore();
        self.sync_tasks();
        self.session.current_user()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let result = self.session.login(email, password).await;
        self.sync_tasks();
        result
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let result = self.session.register(name, email, password).await;
        self.sync_tasks();
        result
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.sync_tasks();
    }

    /// Creates a task for the signed-in user.
    ///
    /// # Errors
    /// - See `TaskStore::add`; `NotAuthenticated` after logout.
    pub async fn add_task(&mut self, input: TaskInput) -> Result<Task, TaskError> {
        self.tasks.add(input).await
    }

    pub async fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task, TaskError> {
        self.tasks.update(id, patch).await
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<Task, TaskError> {
        self.tasks.delete(id).await
    }

    pub async fn toggle_task(&mut self, id: &str) -> Result<Task, TaskError> {
        self.tasks.toggle_status(id).await
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.tasks.set_filter(filter);
    }

    fn sync_tasks(&mut self) {
        self.tasks.set_user(self.session.current_user());
    }
}
