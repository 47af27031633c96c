//! Task store state and reducer.

use crate::model::task::{Task, TaskFilter, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    /// Raw collection in insertion order.
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    /// True from mount or user change until the collection is installed.
    pub is_loading: bool,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            filter: TaskFilter::All,
            is_loading: true,
        }
    }
}

impl TaskState {
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Active user changed; a load is about to start.
    BeginLoad,
    /// Replace the whole collection and finish loading.
    InitTasks(Vec<Task>),
    AddTask(Task),
    /// Replace the task with the same id in place.
    UpdateTask(Task),
    DeleteTask(TaskId),
    SetFilter(TaskFilter),
}

/// Applies one action.
///
/// `UpdateTask` and `DeleteTask` for unknown ids leave the collection as is.
pub fn apply(state: &TaskState, action: TaskAction) -> TaskState {
    match action {
        TaskAction::BeginLoad => TaskState {
            tasks: Vec::new(),
            filter: state.filter,
            is_loading: true,
        },
        TaskAction::InitTasks(tasks) => TaskState {
            tasks,
            filter: state.filter,
            is_loading: false,
        },
        TaskAction::AddTask(task) => {
            let mut next = state.clone();
            next.tasks.push(task);
            next
        }
        TaskAction::UpdateTask(task) => {
            let mut next = state.clone();
            if let Some(slot) = next.tasks.iter_mut().find(|existing| existing.id == task.id) {
                *slot = task;
            }
            next
        }
        TaskAction::DeleteTask(id) => {
            let mut next = state.clone();
            next.tasks.retain(|task| task.id != id);
            next
        }
        TaskAction::SetFilter(filter) => TaskState {
            filter,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{TaskInput, TaskStatus};
    use chrono::{TimeZone, Utc};

    fn task(id: &str, title: &str) -> Task {
        Task::from_input(
            id,
            TaskInput::new(title),
            "1",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn init_clears_loading() {
        let state = apply(
            &TaskState::default(),
            TaskAction::InitTasks(vec![task("a", "A")]),
        );
        assert!(!state.is_loading);
        assert_eq!(state.tasks.len(), 1);
    }

    #[test]
    fn update_replaces_in_place() {
        let state = apply(
            &TaskState::default(),
            TaskAction::InitTasks(vec![task("a", "A"), task("b", "B"), task("c", "C")]),
        );
        let mut updated = task("b", "B2");
        updated.status = TaskStatus::Completed;

        let next = apply(&state, TaskAction::UpdateTask(updated.clone()));
        assert_eq!(next.tasks[1], updated);
        assert_eq!(next.tasks[0].id, "a");
        assert_eq!(next.tasks[2].id, "c");
    }

    #[test]
    fn delete_and_filter() {
        let state = apply(
            &TaskState::default(),
            TaskAction::InitTasks(vec![task("a", "A"), task("b", "B")]),
        );
        let next = apply(&state, TaskAction::DeleteTask("a".to_string()));
        assert_eq!(next.tasks.len(), 1);
        assert!(next.find("a").is_none());

        let filtered = apply(&next, TaskAction::SetFilter(TaskFilter::Completed));
        assert_eq!(filtered.filter, TaskFilter::Completed);
        assert_eq!(filtered.tasks, next.tasks);
    }

    #[test]
    fn begin_load_keeps_filter() {
        let state = apply(
            &TaskState::default(),
            TaskAction::SetFilter(TaskFilter::Pending),
        );
        let loading = apply(&state, TaskAction::BeginLoad);
        assert!(loading.is_loading);
        assert_eq!(loading.filter, TaskFilter::Pending);
    }
}
