//! Task store for the authenticated user.
//!
//! # Responsibility
//! - Hold the current user's task collection and the active filter.
//! - Run create/update/delete after simulated latency and persist the whole
//!   collection under `tasks_<userId>` on every successful mutation.
//! - Reload when the active user changes; install the seed collection on a
//!   user's first load.
//!
//! # Invariants
//! - Every held task belongs to the current user.
//! - The next state is persisted before it replaces the current one, so a
//!   storage failure leaves the store unchanged.
//! - Every mutating call emits exactly one notification; `set_filter` emits none.

use crate::clock::Clock;
use crate::latency::{Latency, LatencyKind};
use crate::model::task::{Task, TaskFilter, TaskId, TaskInput, TaskPatch, TaskStatus};
use crate::model::user::UserProfile;
use crate::notify::{Notification, NotificationSink};
use crate::state::tasks::{self, TaskAction, TaskState};
use crate::storage::{read_json, tasks_key, write_json, JsonRead, KeyValueStore, StorageError};
use crate::view;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Task store operation failures.
#[derive(Debug)]
pub enum TaskError {
    /// No user is signed in.
    NotAuthenticated,
    /// No task with this id in the current collection.
    TaskNotFound(TaskId),
    /// Persisting the collection failed; in-memory state is unchanged.
    Storage(StorageError),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "Authentication required"),
            Self::TaskNotFound(_) => write!(f, "Task not found"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotAuthenticated | Self::TaskNotFound(_) => None,
        }
    }
}

impl From<StorageError> for TaskError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl TaskError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Storage(_) => "storage_failed",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn failure_title(self) -> &'static str {
        match self {
            Self::Add => "Failed to add task",
            Self::Update => "Failed to update task",
            Self::Delete => "Failed to delete task",
        }
    }
}

/// Demonstration tasks installed for a user with nothing persisted yet.
///
/// Seed tasks are owned by `user_id` so the collection invariant holds.
pub fn seed_tasks(user_id: &str) -> Vec<Task> {
    vec![
        seed_task(
            "1",
            "Complete project documentation",
            "Write comprehensive documentation for the current project",
            TaskStatus::InProgress,
            NaiveDate::from_ymd_opt(2023, 12, 15),
            user_id,
            seed_instant(2023, 11, 28, 10, 30),
        ),
        seed_task(
            "2",
            "Review pull requests",
            "Review pending pull requests from the team",
            TaskStatus::Pending,
            NaiveDate::from_ymd_opt(2023, 12, 10),
            user_id,
            seed_instant(2023, 11, 29, 14, 15),
        ),
        seed_task(
            "3",
            "Update dependencies",
            "Update all project dependencies to their latest versions",
            TaskStatus::Completed,
            NaiveDate::from_ymd_opt(2023, 12, 5),
            user_id,
            seed_instant(2023, 11, 27, 9, 45),
        ),
    ]
}

fn seed_task(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    user_id: &str,
    created_at: DateTime<Utc>,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        due_date,
        user_id: user_id.to_string(),
        created_at,
    }
}

fn seed_instant(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Per-user task store.
pub struct TaskStore<S, L, N, K> {
    store: S,
    latency: L,
    notifier: N,
    clock: K,
    user: Option<UserProfile>,
    state: TaskState,
}

impl<S, L, N, K> TaskStore<S, L, N, K>
where
    S: KeyValueStore,
    L: Latency,
    N: NotificationSink,
    K: Clock,
{
    /// Creates an empty store in the loading state with no user.
    pub fn new(store: S, latency: L, notifier: N, clock: K) -> Self {
        Self {
            store,
            latency,
            notifier,
            clock,
            user: None,
            state: TaskState::default(),
        }
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Raw collection in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.state.find(id)
    }

    /// Filtered and sorted copy for rendering.
    pub fn visible(&self) -> Vec<Task> {
        view::visible_tasks(&self.state.tasks, self.state.filter)
    }

    pub fn active_filter(&self) -> TaskFilter {
        self.state.filter
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Follows a change of the signed-in user.
    ///
    /// Only callers that own the session should drive this; `Taskfolio`
    /// does so after every session operation.
    ///
    /// `Some` with a different user (or before the first load) reloads;
    /// `None` clears the collection. Re-announcing the same loaded user is
    /// a no-op.
    pub fn set_user(&mut self, user: Option<&UserProfile>) {
        match user {
            Some(user) => {
                let unchanged = self.user.as_ref().map(|current| current.id.as_str())
                    == Some(user.id.as_str())
                    && !self.state.is_loading;
                if !unchanged {
                    self.load(user);
                }
            }
            None => self.clear(),
        }
    }

    /// Loads `user`'s persisted collection, seeding it on first use.
    ///
    /// Malformed or unreadable data yields an empty collection plus an error
    /// notification; loading always finishes.
    fn load(&mut self, user: &UserProfile) {
        self.user = Some(user.clone());
        self.dispatch(TaskAction::BeginLoad);

        let key = tasks_key(&user.id);
        let tasks = match read_json::<Vec<Task>>(&self.store, &key) {
            Ok(JsonRead::Parsed(tasks)) => {
                info!(
                    "event=tasks_load module=tasks status=ok user_id={} count={}",
                    user.id,
                    tasks.len()
                );
                tasks
            }
            Ok(JsonRead::Missing) => {
                let seeded = seed_tasks(&user.id);
                match write_json(&self.store, &key, &seeded) {
                    Ok(()) => info!(
                        "event=tasks_seed module=tasks status=ok user_id={} count={}",
                        user.id,
                        seeded.len()
                    ),
                    Err(err) => warn!(
                        "event=tasks_seed module=tasks status=error user_id={} error={}",
                        user.id, err
                    ),
                }
                seeded
            }
            Ok(JsonRead::Malformed(err)) => {
                self.report_load_failure(&user.id, "malformed_tasks", &err);
                Vec::new()
            }
            Err(err) => {
                self.report_load_failure(&user.id, "storage_failed", &err);
                Vec::new()
            }
        };

        self.dispatch(TaskAction::InitTasks(tasks));
    }

    /// Drops the user and their tasks (logout).
    fn clear(&mut self) {
        self.user = None;
        self.dispatch(TaskAction::InitTasks(Vec::new()));
    }

    /// Creates a task from `input`.
    ///
    /// Accepts any input, including a blank title; validation belongs to the
    /// form edge (`TaskInput::from_form`).
    ///
    /// # Errors
    /// - `NotAuthenticated` without a user.
    /// - `Storage` when persisting fails.
    pub async fn add(&mut self, input: TaskInput) -> Result<Task, TaskError> {
        let user_id = self.require_user(Mutation::Add)?;
        self.latency.wait(LatencyKind::TaskMutation).await;

        let task = Task::from_input(
            Uuid::new_v4().to_string(),
            input,
            user_id,
            self.clock.now(),
        );
        match self.commit(TaskAction::AddTask(task.clone())) {
            Ok(()) => {
                self.succeed(
                    Mutation::Add,
                    &task.id,
                    Notification::success(
                        "Task added",
                        format!("\"{}\" has been added to your tasks.", task.title),
                    ),
                );
                Ok(task)
            }
            Err(err) => Err(self.fail(Mutation::Add, err)),
        }
    }

    /// Merges `patch` over the task `id`.
    ///
    /// # Errors
    /// - `NotAuthenticated` without a user.
    /// - `TaskNotFound` when `id` is not in the collection (checked before latency).
    /// - `Storage` when persisting fails.
    pub async fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task, TaskError> {
        self.require_user(Mutation::Update)?;
        let existing = self.require_task(Mutation::Update, id)?;
        self.latency.wait(LatencyKind::TaskMutation).await;

        let updated = existing.patched(&patch);
        match self.commit(TaskAction::UpdateTask(updated.clone())) {
            Ok(()) => {
                self.succeed(
                    Mutation::Update,
                    &updated.id,
                    Notification::success(
                        "Task updated",
                        format!("\"{}\" has been updated.", updated.title),
                    ),
                );
                Ok(updated)
            }
            Err(err) => Err(self.fail(Mutation::Update, err)),
        }
    }

    /// Removes the task `id` and returns it.
    ///
    /// # Errors
    /// - `NotAuthenticated` without a user.
    /// - `TaskNotFound` when `id` is not in the collection.
    /// - `Storage` when persisting fails.
    pub async fn delete(&mut self, id: &str) -> Result<Task, TaskError> {
        self.require_user(Mutation::Delete)?;
        let existing = self.require_task(Mutation::Delete, id)?;
        self.latency.wait(LatencyKind::TaskMutation).await;

        match self.commit(TaskAction::DeleteTask(existing.id.clone())) {
            Ok(()) => {
                self.succeed(
                    Mutation::Delete,
                    &existing.id,
                    Notification::success(
                        "Task deleted",
                        format!("\"{}\" has been deleted.", existing.title),
                    ),
                );
                Ok(existing)
            }
            Err(err) => Err(self.fail(Mutation::Delete, err)),
        }
    }

    /// Checkbox toggle: completed tasks reopen as pending, others complete.
    pub async fn toggle_status(&mut self, id: &str) -> Result<Task, TaskError> {
        let next_status = self
            .state
            .find(id)
            .map(|task| task.status.toggled())
            .unwrap_or(TaskStatus::Completed);
        self.update(id, TaskPatch::status(next_status)).await
    }

    /// Changes the visible filter. No persistence, no notification.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.dispatch(TaskAction::SetFilter(filter));
    }

    fn require_user(&self, mutation: Mutation) -> Result<String, TaskError> {
        match &self.user {
            Some(user) => Ok(user.id.clone()),
            None => {
                warn!(
                    "event=task_{} module=tasks status=error error_code=not_authenticated",
                    mutation.verb()
                );
                self.notifier.notify(Notification::error(
                    "Authentication required",
                    format!("You need to be logged in to {} tasks.", mutation.verb()),
                ));
                Err(TaskError::NotAuthenticated)
            }
        }
    }

    fn require_task(&self, mutation: Mutation, id: &str) -> Result<Task, TaskError> {
        match self.state.find(id) {
            Some(task) => Ok(task.clone()),
            None => Err(self.fail(mutation, TaskError::TaskNotFound(id.to_string()))),
        }
    }

    /// Persists the state produced by `action`, then installs it.
    fn commit(&mut self, action: TaskAction) -> Result<(), TaskError> {
        let user_id = match &self.user {
            Some(user) => user.id.clone(),
            None => return Err(TaskError::NotAuthenticated),
        };
        let next = tasks::apply(&self.state, action);
        write_json(&self.store, &tasks_key(&user_id), &next.tasks)?;
        self.state = next;
        Ok(())
    }

    fn succeed(&self, mutation: Mutation, task_id: &str, notification: Notification) {
        info!(
            "event=task_{} module=tasks status=ok task_id={} count={}",
            mutation.verb(),
            task_id,
            self.state.tasks.len()
        );
        self.notifier.notify(notification);
    }

    fn fail(&self, mutation: Mutation, err: TaskError) -> TaskError {
        warn!(
            "event=task_{} module=tasks status=error error_code={}",
            mutation.verb(),
            err.code()
        );
        self.notifier
            .notify(Notification::error(mutation.failure_title(), err.to_string()));
        err
    }

    fn report_load_failure(&self, user_id: &str, code: &str, err: &dyn Error) {
        warn!(
            "event=tasks_load module=tasks status=error user_id={} error_code={} error={}",
            user_id, code, err
        );
        self.notifier.notify(Notification::error(
            "Failed to load tasks",
            "We couldn't load your tasks. Please try again later.",
        ));
    }

    fn dispatch(&mut self, action: TaskAction) {
        self.state = tasks::apply(&self.state, action);
    }
}
