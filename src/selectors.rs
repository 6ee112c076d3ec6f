//! Derived, read-only views over an `AppState` snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Board, Column, Priority, Role, Task, TaskStatus};
use crate::store::AppState;

/// Columns of a board in display order.
pub fn board_columns<'a>(state: &'a AppState, board_id: &str) -> Vec<&'a Column> {
    let mut columns: Vec<&Column> = state
        .columns
        .get(board_id)
        .map(|columns| columns.iter().collect())
        .unwrap_or_default();
    columns.sort_by_key(|c| c.position);
    columns
}

/// Tasks of a column in display order.
pub fn column_tasks<'a>(state: &'a AppState, column_id: &str) -> Vec<&'a Task> {
    let mut tasks: Vec<&Task> = state
        .tasks
        .get(column_id)
        .map(|tasks| tasks.iter().collect())
        .unwrap_or_default();
    tasks.sort_by_key(|t| t.position);
    tasks
}

/// Every loaded task of a board, column by column.
pub fn board_tasks<'a>(state: &'a AppState, board_id: &str) -> Vec<&'a Task> {
    board_columns(state, board_id)
        .into_iter()
        .flat_map(|column| column_tasks(state, &column.id))
        .collect()
}

pub fn find_task<'a>(state: &'a AppState, task_id: &str) -> Option<&'a Task> {
    state.task(task_id)
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
    pub tag: Option<String>,
    /// Case-insensitive match on title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if let Some(assignee) = &self.assignee {
            if !task.assignees.iter().any(|a| a == assignee) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

pub fn filter_tasks<'a>(state: &'a AppState, board_id: &str, filter: &TaskFilter) -> Vec<&'a Task> {
    board_tasks(state, board_id)
        .into_iter()
        .filter(|task| filter.matches(task))
        .collect()
}

pub fn starred_boards(state: &AppState) -> Vec<&Board> {
    state.boards.iter().filter(|b| b.starred).collect()
}

/// Most urgent first, then by title.
pub fn boards_by_priority(state: &AppState) -> Vec<&Board> {
    let mut boards: Vec<&Board> = state.boards.iter().collect();
    boards.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.title.cmp(&b.title)));
    boards
}

pub fn unread_count(state: &AppState) -> usize {
    state.notifications.iter().filter(|n| !n.read).count()
}

pub fn overdue_tasks(state: &AppState, now: DateTime<Utc>) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = state
        .tasks
        .values()
        .flatten()
        .filter(|t| t.is_overdue(now))
        .collect();
    tasks.sort_by_key(|t| t.due_date);
    tasks
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Completed over total, 0.0 for an empty board.
    pub completion: f64,
}

pub fn board_stats(state: &AppState, board_id: &str) -> BoardStats {
    let tasks = board_tasks(state, board_id);
    let mut by_status: BTreeMap<String, usize> = TaskStatus::ALL
        .iter()
        .map(|s| (s.to_string(), 0))
        .collect();
    for task in &tasks {
        *by_status.entry(task.status.to_string()).or_default() += 1;
    }
    let total = tasks.len();
    let completed = by_status.get(TaskStatus::Completed.as_str()).copied().unwrap_or(0);
    BoardStats {
        total,
        completion: if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        },
        by_status,
    }
}

/// The user's role on a board. The board owner counts as `Owner` even when
/// the member list has not been fetched.
pub fn member_role(state: &AppState, board_id: &str, user_id: &str) -> Option<Role> {
    if state
        .board(board_id)
        .is_some_and(|b| b.owner.as_deref() == Some(user_id))
    {
        return Some(Role::Owner);
    }
    state
        .members
        .get(board_id)?
        .iter()
        .find(|m| m.user_id == user_id)
        .map(|m| m.role)
}
