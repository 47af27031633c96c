//! Due-date display facts.

use crate::model::task::TaskStatus;
use chrono::{Days, NaiveDate};

const NO_DUE_DATE: &str = "No due date";
const UPCOMING_WINDOW_DAYS: u64 = 7;

/// True iff the task is not completed and its due day is strictly before `today`.
pub fn is_overdue(due_date: Option<NaiveDate>, status: TaskStatus, today: NaiveDate) -> bool {
    match due_date {
        Some(due) => !status.is_completed() && due < today,
        None => false,
    }
}

/// Card label: `No due date`, `Today`, `Tomorrow`, or e.g. `Dec 5, 2023`.
pub fn display_label(due_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due_date else {
        return NO_DUE_DATE.to_string();
    };
    if due == today {
        "Today".to_string()
    } else if Some(due) == today.succ_opt() {
        "Tomorrow".to_string()
    } else {
        long_date(due)
    }
}

/// Sentence-style description used in tooltips and summaries.
///
/// Today/tomorrow first, then overdue, then weekday names within the next
/// week, then the full date.
pub fn relative_description(due_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due_date else {
        return NO_DUE_DATE.to_string();
    };
    if due == today {
        return "Due today".to_string();
    }
    if Some(due) == today.succ_opt() {
        return "Due tomorrow".to_string();
    }
    if due < today {
        return "Overdue".to_string();
    }
    let within_week = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .map_or(false, |limit| due < limit);
    if within_week {
        format!("Due {}", due.format("%A"))
    } else {
        format!("Due {}", long_date(due))
    }
}

/// `YYYY-MM-DD` for date inputs, empty when absent.
pub fn format_for_input(due_date: Option<NaiveDate>) -> String {
    due_date
        .map(|due| due.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn long_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
