//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its input/patch shapes.
//! - Provide the edge-side validation used by form collaborators.
//!
//! # Invariants
//! - `id`, `user_id` and `created_at` are fixed at creation; patches never
//!   touch them.
//! - Wire names are `camelCase`; statuses are `pending|in-progress|completed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier, unique within one user's collection.
pub type TaskId = String;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    /// Work is in progress.
    InProgress,
    /// Done. Completed tasks always sort last.
    Completed,
}

impl TaskStatus {
    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a wire value; returns `None` for unknown input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Human-facing badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Checkbox toggle: completed reopens as pending, anything else completes.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status restriction applied to the visible task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl TaskFilter {
    /// Every filter in display order.
    pub const ALL: [TaskFilter; 4] = [
        TaskFilter::All,
        TaskFilter::Pending,
        TaskFilter::InProgress,
        TaskFilter::Completed,
    ];

    /// Returns whether a task with `status` passes this filter.
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TaskStatus::Pending,
            Self::InProgress => status == TaskStatus::InProgress,
            Self::Completed => status == TaskStatus::Completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            other => TaskStatus::parse(other).map(Self::from),
        }
    }

    /// Filter tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl From<TaskStatus> for TaskFilter {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Pending => Self::Pending,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Completed => Self::Completed,
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Calendar date without time component.
    pub due_date: Option<NaiveDate>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from caller input plus store-synthesized identity.
    pub fn from_input(
        id: impl Into<TaskId>,
        input: TaskInput,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            user_id: user_id.into(),
            created_at,
        }
    }

    /// Returns a copy with `patch` merged over the editable fields.
    ///
    /// Shallow overwrite: only fields present in the patch change.
    pub fn patched(&self, patch: &TaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        next
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

impl TaskInput {
    /// Pending task with no description and no due date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Normalizes raw form fields the way the task dialog submits them.
    ///
    /// Title and description are trimmed; a blank title is rejected.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::BlankTitle` when the trimmed title is empty.
    pub fn from_form(
        title: &str,
        description: &str,
        status: TaskStatus,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            status,
            due_date,
        })
    }
}

/// Partial update over `TaskInput` fields.
///
/// `due_date` is doubly optional: `None` leaves the date untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl From<TaskInput> for TaskPatch {
    /// Full replacement of every editable field, as submitted by the edit dialog.
    fn from(value: TaskInput) -> Self {
        Self {
            title: Some(value.title),
            description: Some(value.description),
            status: Some(value.status),
            due_date: Some(value.due_date),
        }
    }
}

/// Edge-side validation failures for task form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        Task::from_input(
            "t-1",
            TaskInput::new("Write docs")
                .with_description("api section")
                .with_due_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            "1",
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn patched_only_overwrites_present_fields() {
        let task = sample_task();
        let next = task.patched(&TaskPatch::status(TaskStatus::Completed));

        assert_eq!(next.status, TaskStatus::Completed);
        assert_eq!(next.title, task.title);
        assert_eq!(next.description, task.description);
        assert_eq!(next.due_date, task.due_date);
        assert_eq!(next.id, task.id);
        assert_eq!(next.user_id, task.user_id);
        assert_eq!(next.created_at, task.created_at);
    }

    #[test]
    fn patched_can_clear_due_date() {
        let next = sample_task().patched(&TaskPatch::default().with_due_date(None));
        assert_eq!(next.due_date, None);
    }

    #[test]
    fn from_form_trims_and_rejects_blank_title() {
        let input =
            TaskInput::from_form("  Ship it ", "  notes ", TaskStatus::InProgress, None).unwrap();
        assert_eq!(input.title, "Ship it");
        assert_eq!(input.description, "notes");

        let err = TaskInput::from_form("   ", "", TaskStatus::Pending, None).unwrap_err();
        assert_eq!(err, TaskValidationError::BlankTitle);
    }

    #[test]
    fn toggled_reopens_completed_and_completes_others() {
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn filter_parse_accepts_all_and_statuses() {
        assert_eq!(TaskFilter::parse("all"), Some(TaskFilter::All));
        assert_eq!(
            TaskFilter::parse("in-progress"),
            Some(TaskFilter::InProgress)
        );
        assert_eq!(TaskFilter::parse("done"), None);
    }

    #[test]
    fn labels_match_badges_and_tabs() {
        let status_labels: Vec<&str> = [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ]
        .into_iter()
        .map(TaskStatus::label)
        .collect();
        assert_eq!(status_labels, vec!["Pending", "In Progress", "Completed"]);

        let filter_labels: Vec<&str> = TaskFilter::ALL.into_iter().map(TaskFilter::label).collect();
        assert_eq!(filter_labels, vec!["All", "Pending", "In Progress", "Completed"]);
    }

    #[test]
    fn patch_from_input_replaces_every_editable_field() {
        let task = sample_task();
        let edited = TaskInput::new("Rewrite docs").with_status(TaskStatus::Completed);

        let next = task.patched(&TaskPatch::from(edited));

        assert_eq!(next.title, "Rewrite docs");
        assert_eq!(next.description, "");
        assert_eq!(next.status, TaskStatus::Completed);
        assert_eq!(next.due_date, None);
        assert_eq!(next.id, task.id);
        assert_eq!(next.created_at, task.created_at);
    }
}
