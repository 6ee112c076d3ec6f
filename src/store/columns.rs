use futures::future::join_all;
use tracing::{info, warn};

use super::tasks::keep_column_tasks;
use super::{ResourceKey, Store, StoreError, StoreResult};
use crate::client::{CreateColumnRequest, ReorderColumnsRequest, UpdateColumnRequest};
use crate::config::MutationMode;
use crate::models::{Column, ColumnId};
use crate::ordering;

impl Store {
    // * Read .................................................................

    pub async fn fetch_columns(&mut self, board_id: &str) -> StoreResult<()> {
        let key = ResourceKey::Columns(board_id.to_string());
        if !self.begin_fetch(&key) {
            return Ok(());
        }
        let result = self.client.fetch_columns(board_id).await.map_err(StoreError::from);
        let result = match result {
            Ok(columns) => {
                let (columns, foreign): (Vec<Column>, Vec<Column>) =
                    columns.into_iter().partition(|c| c.board_id == board_id);
                for column in foreign {
                    warn!("Dropping column {} filed under board {}", column.id, column.board_id);
                }
                self.commit(|state| {
                    state.set_columns(board_id, columns);
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

    pub async fn refresh_columns(&mut self, board_id: &str) -> StoreResult<()> {
        self.invalidate(&ResourceKey::Columns(board_id.to_string()));
        self.fetch_columns(board_id).await
    }

    /// Fetches the board's columns, then the tasks of every column that is
    /// not already fresh, concurrently. Selects the board on success.
    pub async fn load_board(&mut self, board_id: &str) -> StoreResult<()> {
        self.fetch_columns(board_id).await?;

        let column_ids: Vec<ColumnId> = self
            .state
            .columns
            .get(board_id)
            .map(|columns| {
                columns
                    .iter()
                    .map(|c| c.id.clone())
                    .filter(|id| self.state.cache.should_fetch(&ResourceKey::Tasks(id.clone())))
                    .collect()
            })
            .unwrap_or_default();

        if column_ids.is_empty() {
            self.select_board(Some(board_id));
            return Ok(());
        }

        self.commit(|state| {
            for id in &column_ids {
                state.cache.mark_loading(ResourceKey::Tasks(id.clone()));
            }
            state.ui.loading = true;
        });

        let client = &self.client;
        let results = join_all(column_ids.iter().map(|id| client.fetch_tasks(id))).await;

        let mut first_error = None;
        self.commit(|state| {
            for (column_id, result) in column_ids.iter().zip(results) {
                let key = ResourceKey::Tasks(column_id.clone());
                match result {
                    Ok(tasks) => {
                        state.set_tasks(column_id, keep_column_tasks(column_id, tasks));
                        state.cache.mark_fresh(key);
                    }
                    Err(e) => {
                        state.cache.mark_failed(key);
                        first_error.get_or_insert(e);
                    }
                }
            }
            state.current_board = Some(board_id.to_string());
        });

        let result = match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        };
        self.finish(result)
    }

    // * Write ................................................................

    /// Appends a column at the end of the board.
    pub async fn create_column(
        &mut self,
        board_id: &str,
        title: &str,
        color: Option<String>,
    ) -> StoreResult<Column> {
        let position = self
            .state
            .columns
            .get(board_id)
            .map(|columns| ordering::next_position(columns))
            .unwrap_or(0);
        let request = CreateColumnRequest {
            board_id: board_id.to_string(),
            title: title.to_string(),
            color,
            position,
        };

        self.begin();
        let result = self.client.create_column(&request).await.map_err(StoreError::from);
        if let Ok(column) = &result {
            info!("Created column {} at position {}", column.id, column.position);
            let column = column.clone();
            self.commit(|state| state.upsert_column(column));
        }
        self.finish(result)
    }

    pub async fn update_column(
        &mut self,
        id: &str,
        patch: UpdateColumnRequest,
    ) -> StoreResult<Column> {
        self.begin();
        let result = self.client.update_column(id, &patch).await.map_err(StoreError::from);
        if let Ok(column) = &result {
            let column = column.clone();
            self.commit(|state| state.upsert_column(column));
        }
        self.finish(result)
    }

    /// Removes the column and every task it held.
    pub async fn delete_column(&mut self, id: &str) -> StoreResult<()> {
        self.begin();
        let result = self.client.delete_column(id).await.map_err(StoreError::from);
        if result.is_ok() {
            info!("Deleted column {}", id);
            self.commit(|state| state.remove_column(id));
        }
        self.finish(result)
    }

    // * Ordering .............................................................

    /// Moves the column at `from` to `to` and renumbers the board's columns
    /// `0..n-1`, persisting the whole batch of positions.
    pub async fn reorder_columns(&mut self, board_id: &str, from: usize, to: usize) -> StoreResult<()> {
        let previous = match self.state.columns.get(board_id) {
            Some(columns) => columns.clone(),
            None => return self.finish(Err(StoreError::not_loaded("columns of board", board_id))),
        };
        let mut reordered = previous.clone();
        if let Err(e) = ordering::reorder(&mut reordered, from, to) {
            return self.finish(Err(e.into()));
        }
        let request = ReorderColumnsRequest {
            board_id: board_id.to_string(),
            columns: ordering::position_updates(&reordered),
        };

        self.begin();
        let result = match self.mode {
            MutationMode::Optimistic => {
                self.commit(|state| state.set_columns(board_id, reordered));
                let result = self.client.reorder_columns(&request).await.map_err(StoreError::from);
                if let Err(e) = &result {
                    warn!("Reordering columns of board {} failed, restoring: {}", board_id, e);
                    self.commit(|state| {
                        state.set_columns(board_id, previous);
                        state
                            .cache
                            .mark_stale(&ResourceKey::Columns(board_id.to_string()));
                    });
                }
                result
            }
            MutationMode::Confirm => {
                let result = self.client.reorder_columns(&request).await.map_err(StoreError::from);
                if result.is_ok() {
                    self.commit(|state| state.set_columns(board_id, reordered));
                }
                result
            }
        };
        if result.is_ok() {
            info!("Moved column {} -> {} on board {}", from, to, board_id);
        }
        self.finish(result)
    }
}
