use std::collections::HashMap;

use super::cache::{ResourceCache, ResourceKey};
use crate::models::{Board, BoardId, Column, ColumnId, Member, Notification, Task, User};
use crate::ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// True while an action is waiting on the backend.
    pub loading: bool,
    /// Last error, cleared by `clear_error` or the next successful action.
    pub error: Option<String>,
    /// Set by a forced logout; the presentation layer should go back to the
    /// root route and prompt for credentials.
    pub sign_in_required: bool,
}

/// One immutable snapshot of everything the client knows.
///
/// Columns are grouped by board id and tasks by column id. Each list is kept
/// in display order (ascending position).
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub boards: Vec<Board>,
    pub current_board: Option<BoardId>,
    pub columns: HashMap<BoardId, Vec<Column>>,
    pub tasks: HashMap<ColumnId, Vec<Task>>,
    pub members: HashMap<BoardId, Vec<Member>>,
    pub notifications: Vec<Notification>,
    pub ui: UiState,
    pub cache: ResourceCache,
}

impl AppState {
    // * Lookups ..............................................................

    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.values().flatten().find(|c| c.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.values().flatten().find(|t| t.id == id)
    }

    /// Column whose list currently holds the task.
    pub fn column_of_task(&self, task_id: &str) -> Option<&ColumnId> {
        self.tasks
            .iter()
            .find(|(_, tasks)| tasks.iter().any(|t| t.id == task_id))
            .map(|(column_id, _)| column_id)
    }

    // * Boards ...............................................................

    pub(crate) fn upsert_board(&mut self, board: Board) {
        match self.boards.iter_mut().find(|b| b.id == board.id) {
            Some(existing) => *existing = board,
            None => self.boards.push(board),
        }
    }

    /// Drops the board with its columns, their tasks and its member list.
    pub(crate) fn remove_board(&mut self, board_id: &str) {
        self.boards.retain(|b| b.id != board_id);
        if let Some(columns) = self.columns.remove(board_id) {
            for column in columns {
                self.tasks.remove(&column.id);
                self.cache.forget(&ResourceKey::Tasks(column.id));
            }
        }
        // Tasks fetched through getAllTasks may belong to columns never loaded
        for tasks in self.tasks.values_mut() {
            tasks.retain(|t| t.board_id != board_id);
        }
        self.tasks.retain(|_, tasks| !tasks.is_empty());
        self.members.remove(board_id);
        self.cache.forget(&ResourceKey::Columns(board_id.to_string()));
        self.cache.forget(&ResourceKey::Members(board_id.to_string()));
        if self.current_board.as_deref() == Some(board_id) {
            self.current_board = None;
        }
    }

    // * Columns ..............................................................

    pub(crate) fn set_columns(&mut self, board_id: &str, mut columns: Vec<Column>) {
        ordering::sort_by_position(&mut columns);
        self.columns.insert(board_id.to_string(), columns);
    }

    pub(crate) fn upsert_column(&mut self, column: Column) {
        let columns = self.columns.entry(column.board_id.clone()).or_default();
        match columns.iter_mut().find(|c| c.id == column.id) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        ordering::sort_by_position(columns);
    }

    /// Drops the column and every task it owns.
    pub(crate) fn remove_column(&mut self, column_id: &str) {
        for columns in self.columns.values_mut() {
            columns.retain(|c| c.id != column_id);
        }
        self.tasks.remove(column_id);
        self.cache.forget(&ResourceKey::Tasks(column_id.to_string()));
    }

    // * Tasks ................................................................

    /// Replaces a column's list. Tasks in it are dropped from any other
    /// column they were still filed under, and those lists are renumbered.
    pub(crate) fn set_tasks(&mut self, column_id: &str, mut tasks: Vec<Task>) {
        ordering::sort_by_position(&mut tasks);
        for (other, list) in self.tasks.iter_mut() {
            if other == column_id {
                continue;
            }
            let before = list.len();
            list.retain(|t| !tasks.iter().any(|incoming| incoming.id == t.id));
            if list.len() != before {
                ordering::renumber(list);
            }
        }
        self.tasks.insert(column_id.to_string(), tasks);
    }

    /// Replaces the task in place, or files it under its column when it is
    /// new or the server reports a different column.
    pub(crate) fn upsert_task(&mut self, task: Task) {
        if let Some(current) = self.column_of_task(&task.id).cloned() {
            if current == task.column_id {
                if let Some(list) = self.tasks.get_mut(&current) {
                    if let Some(existing) = list.iter_mut().find(|t| t.id == task.id) {
                        *existing = task;
                    }
                    ordering::sort_by_position(list);
                }
                return;
            }
            self.remove_task(&task.id);
        }
        let list = self.tasks.entry(task.column_id.clone()).or_default();
        list.push(task);
        ordering::sort_by_position(list);
    }

    pub(crate) fn remove_task(&mut self, task_id: &str) {
        for tasks in self.tasks.values_mut() {
            tasks.retain(|t| t.id != task_id);
        }
    }

    // * Session ..............................................................

    /// Wipes everything tied to the signed-in user.
    pub(crate) fn clear_user_data(&mut self) {
        self.auth = AuthState::default();
        self.boards.clear();
        self.current_board = None;
        self.columns.clear();
        self.tasks.clear();
        self.members.clear();
        self.notifications.clear();
        self.cache.clear();
    }
}
