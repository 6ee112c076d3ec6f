use std::collections::HashMap;
use tracing::{info, warn};

use super::{ResourceKey, Store, StoreError, StoreResult};
use crate::client::{CreateTaskRequest, MoveTaskRequest, UpdateTaskRequest};
use crate::config::MutationMode;
use crate::models::{ColumnId, Task};
use crate::ordering;

/// Sibling lists replaced together in a single commit.
type TaskLists = Vec<(ColumnId, Vec<Task>)>;

/// Drops tasks the server filed under a different column than requested.
pub(super) fn keep_column_tasks(column_id: &str, tasks: Vec<Task>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| {
            let keep = task.column_id == column_id;
            if !keep {
                warn!(
                    "Dropping task {} listed under column {} but filed under {}",
                    task.id, column_id, task.column_id
                );
            }
            keep
        })
        .collect()
}

impl Store {
    // * Read .................................................................

    pub async fn fetch_tasks(&mut self, column_id: &str) -> StoreResult<()> {
        let key = ResourceKey::Tasks(column_id.to_string());
        if !self.begin_fetch(&key) {
            return Ok(());
        }
        let result = self.client.fetch_tasks(column_id).await.map_err(StoreError::from);
        let result = match result {
            Ok(tasks) => {
                let tasks = keep_column_tasks(column_id, tasks);
                self.commit(|state| {
                    state.set_tasks(column_id, tasks);
                    state.cache.mark_fresh(key);
                });
                Ok(())
            }
            Err(e) => {
                self.commit(|state| state.cache.mark_failed(key));
                Err(e)
            }
        };
        self.finish(result)
    }

    /// Loads every task visible to the user, grouped into their columns.
    pub async fn fetch_all_tasks(&mut self) -> StoreResult<()> {
        if !self.begin_fetch(&ResourceKey::AllTasks) {
            return Ok(());
        }
        let result = self.client.fetch_all_tasks().await.map_err(StoreError::from);
        let result = match result {
            Ok(tasks) => {
                let mut grouped: HashMap<ColumnId, Vec<Task>> = HashMap::new();
                for task in tasks {
                    grouped.entry(task.column_id.clone()).or_default().push(task);
                }
                self.commit(|state| {
                    // Columns the response leaves out hold no tasks anymore
                    let emptied: Vec<ColumnId> = state
                        .tasks
                        .keys()
                        .filter(|id| !grouped.contains_key(*id))
                        .cloned()
                        .collect();
                    for column_id in emptied {
                        state.tasks.insert(column_id.clone(), Vec::new());
                        state.cache.mark_fresh(ResourceKey::Tasks(column_id));
                    }
                    for (column_id, tasks) in grouped {
                        state.set_tasks(&column_id, tasks);
                        state.cache.mark_fresh(ResourceKey::Tasks(column_id));
                    }
                    state.cache.mark_fresh(ResourceKey::AllTasks);
                });
                Ok(())
            }
            Err(e) => {
                self.commit(|state| state.cache.mark_failed(ResourceKey::AllTasks));
                Err(e)
            }
        };
        self.finish(result)
    }

    pub async fn fetch_task_details(&mut self, id: &str) -> StoreResult<Task> {
        self.begin();
        let result = self.client.fetch_task(id).await.map_err(StoreError::from);
        self.merge_task(result)
    }

    // * Write ................................................................

    /// Appends the task at the end of its column.
    pub async fn create_task(&mut self, mut request: CreateTaskRequest) -> StoreResult<Task> {
        request.position = self
            .state
            .tasks
            .get(&request.column_id)
            .map(|tasks| ordering::next_position(tasks))
            .unwrap_or(0);

        self.begin();
        let result = self.client.create_task(&request).await.map_err(StoreError::from);
        if let Ok(task) = &result {
            info!("Created task {} in column {}", task.id, task.column_id);
        }
        self.merge_task(result)
    }

    pub async fn update_task(&mut self, id: &str, patch: UpdateTaskRequest) -> StoreResult<Task> {
        self.begin();
        let result = self.client.update_task(id, &patch).await.map_err(StoreError::from);
        self.merge_task(result)
    }

    pub async fn delete_task(&mut self, id: &str) -> StoreResult<()> {
        self.begin();
        let result = self.client.delete_task(id).await.map_err(StoreError::from);
        if result.is_ok() {
            info!("Deleted task {}", id);
            self.commit(|state| state.remove_task(id));
        }
        self.finish(result)
    }

    pub async fn add_assignee(&mut self, task_id: &str, user_id: &str) -> StoreResult<Task> {
        self.begin();
        let result = self.client.add_assignee(task_id, user_id).await.map_err(StoreError::from);
        self.merge_task(result)
    }

    pub async fn remove_assignee(&mut self, task_id: &str, user_id: &str) -> StoreResult<Task> {
        self.begin();
        let result = self
            .client
            .remove_assignee(task_id, user_id)
            .await
            .map_err(StoreError::from);
        self.merge_task(result)
    }

    pub async fn add_tag(&mut self, task_id: &str, tag: &str) -> StoreResult<Task> {
        self.begin();
        let result = self.client.add_tag(task_id, tag).await.map_err(StoreError::from);
        self.merge_task(result)
    }

    pub async fn remove_tag(&mut self, task_id: &str, tag: &str) -> StoreResult<Task> {
        self.begin();
        let result = self.client.remove_tag(task_id, tag).await.map_err(StoreError::from);
        self.merge_task(result)
    }

    // * Ordering .............................................................

    /// Moves the task into `target_column_id` at `new_position`, the index it
    /// should occupy once it has been removed from its current list. Both
    /// affected lists are renumbered and replaced in one commit.
    pub async fn move_task(
        &mut self,
        task_id: &str,
        target_column_id: &str,
        new_position: usize,
    ) -> StoreResult<()> {
        let planned = self.plan_move(task_id, target_column_id, new_position);
        let (request, before, after) = match planned {
            Ok(plan) => plan,
            Err(e) => return self.finish(Err(e)),
        };

        self.begin();
        let result = match self.mode {
            MutationMode::Optimistic => {
                self.replace_task_lists(after);
                let result = self.client.move_task(&request).await.map_err(StoreError::from);
                if let Err(e) = &result {
                    warn!("Moving task {} failed, restoring: {}", task_id, e);
                    let stale: Vec<ColumnId> = before.iter().map(|(id, _)| id.clone()).collect();
                    self.replace_task_lists(before);
                    self.commit(|state| {
                        for column_id in stale {
                            state.cache.mark_stale(&ResourceKey::Tasks(column_id));
                        }
                    });
                }
                result
            }
            MutationMode::Confirm => {
                let result = self.client.move_task(&request).await.map_err(StoreError::from);
                if result.is_ok() {
                    self.replace_task_lists(after);
                }
                result
            }
        };
        if result.is_ok() {
            info!(
                "Moved task {} from {} to {} at {}",
                request.task_id,
                request.source_column_id,
                request.target_column_id,
                request.new_position
            );
        }
        self.finish(result)
    }

    /// Computes the request plus the lists before and after the move without
    /// touching state.
    fn plan_move(
        &self,
        task_id: &str,
        target_column_id: &str,
        new_position: usize,
    ) -> StoreResult<(MoveTaskRequest, TaskLists, TaskLists)> {
        let source_id = self
            .state
            .column_of_task(task_id)
            .cloned()
            .ok_or_else(|| StoreError::not_loaded("task", task_id))?;
        let target_board = self.state.column(target_column_id).map(|c| c.board_id.clone());
        if target_board.is_none() && !self.state.tasks.contains_key(target_column_id) {
            return Err(StoreError::not_loaded("column", target_column_id));
        }

        let source = self.state.tasks.get(&source_id).cloned().unwrap_or_default();
        let from = ordering::index_of(&source, task_id)?;

        let (before, after, final_position) = if source_id == target_column_id {
            let mut list = source.clone();
            ordering::move_within(&mut list, from, new_position)?;
            let final_position = ordering::index_of(&list, task_id)?;
            (
                vec![(source_id.clone(), source)],
                vec![(source_id.clone(), list)],
                final_position,
            )
        } else {
            let target = self
                .state
                .tasks
                .get(target_column_id)
                .cloned()
                .unwrap_or_default();
            let mut new_source = source.clone();
            let mut new_target = target.clone();
            let moved = ordering::move_between(&mut new_source, &mut new_target, from, new_position)?;
            moved.column_id = target_column_id.to_string();
            if let Some(board_id) = target_board {
                moved.board_id = board_id;
            }
            let final_position = moved.position as usize;
            (
                vec![
                    (source_id.clone(), source),
                    (target_column_id.to_string(), target),
                ],
                vec![
                    (source_id.clone(), new_source),
                    (target_column_id.to_string(), new_target),
                ],
                final_position,
            )
        };

        let request = MoveTaskRequest {
            task_id: task_id.to_string(),
            source_column_id: source_id,
            target_column_id: target_column_id.to_string(),
            new_position: final_position as i32,
        };
        Ok((request, before, after))
    }

    fn replace_task_lists(&mut self, lists: TaskLists) {
        self.commit(|state| {
            for (column_id, tasks) in lists {
                state.tasks.insert(column_id, tasks);
            }
        });
    }

    fn merge_task(&mut self, result: Result<Task, StoreError>) -> StoreResult<Task> {
        if let Ok(task) = &result {
            let task = task.clone();
            self.commit(|state| state.upsert_task(task));
        }
        self.finish(result)
    }
}

