//! Filtering and ordering of the task list.

use crate::model::task::{Task, TaskFilter};
use std::cmp::Ordering;

/// Tasks passing `filter`, in their original order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: TaskFilter) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task.status))
        .collect()
}

/// Display order for two tasks.
///
/// Keys in priority order:
/// 1. non-completed before completed;
/// 2. tasks with a due date before tasks without one;
/// 3. earlier due date first;
/// 4. newer `created_at` first.
pub fn compare_tasks(left: &Task, right: &Task) -> Ordering {
    left.status
        .is_completed()
        .cmp(&right.status.is_completed())
        .then_with(|| match (left.due_date, right.due_date) {
            (Some(left_due), Some(right_due)) => left_due.cmp(&right_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| right.created_at.cmp(&left.created_at))
}

/// Sorts in place with `compare_tasks`; equal keys keep their relative order.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

/// Filtered, sorted copy of `tasks` ready for rendering.
pub fn visible_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<Task> {
    let mut visible: Vec<Task> = filter_tasks(tasks, filter).into_iter().cloned().collect();
    sort_tasks(&mut visible);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{TaskInput, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(id: &str, status: TaskStatus, due: Option<(i32, u32, u32)>, created_hour: u32) -> Task {
        let mut input = TaskInput::new(id).with_status(status);
        input.due_date = due.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
        Task::from_input(
            id,
            input,
            "1",
            Utc.with_ymd_and_hms(2024, 1, 1, created_hour, 0, 0).unwrap(),
        )
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn completed_sinks_below_everything() {
        let tasks = vec![
            task("done-early", TaskStatus::Completed, Some((2020, 1, 1)), 1),
            task("open-undated", TaskStatus::Pending, None, 2),
        ];
        assert_eq!(
            ids(&visible_tasks(&tasks, TaskFilter::All)),
            vec!["open-undated", "done-early"]
        );
    }

    #[test]
    fn dated_before_undated_and_ascending_by_date() {
        let tasks = vec![
            task("undated", TaskStatus::Pending, None, 9),
            task("late", TaskStatus::InProgress, Some((2024, 5, 2)), 1),
            task("early", TaskStatus::Pending, Some((2024, 5, 1)), 2),
        ];
        assert_eq!(
            ids(&visible_tasks(&tasks, TaskFilter::All)),
            vec!["early", "late", "undated"]
        );
    }

    #[test]
    fn undated_ties_break_newest_first() {
        let tasks = vec![
            task("old", TaskStatus::Pending, None, 1),
            task("new", TaskStatus::Pending, None, 5),
            task("mid", TaskStatus::Pending, None, 3),
        ];
        assert_eq!(
            ids(&visible_tasks(&tasks, TaskFilter::All)),
            vec!["new", "mid", "old"]
        );
    }

    #[test]
    fn same_due_date_falls_back_to_created_at() {
        let tasks = vec![
            task("first", TaskStatus::Pending, Some((2024, 5, 1)), 1),
            task("second", TaskStatus::Pending, Some((2024, 5, 1)), 2),
        ];
        assert_eq!(
            ids(&visible_tasks(&tasks, TaskFilter::All)),
            vec!["second", "first"]
        );
    }

    #[test]
    fn sort_is_stable_for_identical_keys() {
        let tasks = vec![
            task("a", TaskStatus::Pending, None, 4),
            task("b", TaskStatus::Pending, None, 4),
            task("c", TaskStatus::Pending, None, 4),
        ];
        assert_eq!(
            ids(&visible_tasks(&tasks, TaskFilter::All)),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn filter_keeps_matching_status_only() {
        let tasks = vec![
            task("p", TaskStatus::Pending, None, 1),
            task("i", TaskStatus::InProgress, None, 1),
            task("c", TaskStatus::Completed, None, 1),
        ];
        let in_progress = filter_tasks(&tasks, TaskFilter::InProgress);
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, "i");
        assert_eq!(filter_tasks(&tasks, TaskFilter::All).len(), 3);
    }

    #[test]
    fn visible_tasks_is_idempotent() {
        let tasks = vec![
            task("x", TaskStatus::Completed, None, 1),
            task("y", TaskStatus::Pending, Some((2024, 2, 2)), 2),
            task("z", TaskStatus::Pending, None, 3),
        ];
        let once = visible_tasks(&tasks, TaskFilter::All);
        let twice = visible_tasks(&once, TaskFilter::All);
        assert_eq!(once, twice);
    }
}
