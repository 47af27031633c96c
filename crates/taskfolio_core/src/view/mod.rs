//! Pure derivations over the raw task collection.
//!
//! # Responsibility
//! - Compute the visible (filtered + sorted) task list.
//! - Compute due-date display facts (overdue flag, labels).
//!
//! # Invariants
//! - Every function is deterministic in its inputs; "today" is always
//!   passed in, never read from the system clock here.

pub mod due_date;
pub mod task_list;

pub use due_date::{display_label, format_for_input, is_overdue, relative_description};
pub use task_list::{compare_tasks, filter_tasks, sort_tasks, visible_tasks};
