use tracing::{info, warn};

use super::{ResourceKey, Store, StoreError, StoreResult};
use crate::client::{CreateBoardRequest, UpdateBoardRequest};
use crate::config::MutationMode;
use crate::models::Board;

impl Store {
    // * Read .................................................................

    pub async fn fetch_boards(&mut self) -> StoreResult<()> {
        if !self.begin_fetch(&ResourceKey::Boards) {
            return Ok(());
        }
        let result = self.client.fetch_boards().await.map_err(StoreError::from);
        let result = match result {
            Ok(boards) => {
                self.commit(|state| {
                    state.boards = boards;
                    state.cache.mark_fresh(ResourceKey::Boards);
                });
                Ok(())
            }
            Err(e) => {
                self.commit(|state| state.cache.mark_failed(ResourceKey::Boards));
                Err(e)
            }
        };
        self.finish(result)
    }

    pub async fn refresh_boards(&mut self) -> StoreResult<()> {
        self.invalidate(&ResourceKey::Boards);
        self.fetch_boards().await
    }

    pub async fn fetch_board(&mut self, id: &str) -> StoreResult<Board> {
        self.begin();
        let result = self.client.fetch_board(id).await.map_err(StoreError::from);
        if let Ok(board) = &result {
            let board = board.clone();
            self.commit(|state| state.upsert_board(board));
        }
        self.finish(result)
    }

    // * Write ................................................................

    pub async fn create_board(&mut self, request: CreateBoardRequest) -> StoreResult<Board> {
        self.begin();
        let result = self.client.create_board(&request).await.map_err(StoreError::from);
        if let Ok(board) = &result {
            info!("Created board {} ({})", board.title, board.id);
            let board = board.clone();
            self.commit(|state| state.upsert_board(board));
        }
        self.finish(result)
    }

    /// In optimistic mode the patch is applied locally first and the previous
    /// board restored if the backend refuses it.
    pub async fn update_board(&mut self, id: &str, patch: UpdateBoardRequest) -> StoreResult<Board> {
        let previous = self.state.board(id).cloned();
        self.begin();
        if let (MutationMode::Optimistic, Some(previous)) = (self.mode, &previous) {
            let mut patched = previous.clone();
            patch.apply_to(&mut patched);
            self.commit(|state| state.upsert_board(patched));
        }
        let result = self.client.update_board(id, &patch).await.map_err(StoreError::from);
        match &result {
            Ok(board) => {
                let board = board.clone();
                self.commit(|state| state.upsert_board(board));
            }
            Err(e) => {
                if let (MutationMode::Optimistic, Some(previous)) = (self.mode, previous) {
                    warn!("Updating board {} failed, restoring: {}", id, e);
                    self.commit(|state| state.upsert_board(previous));
                }
            }
        }
        self.finish(result)
    }

    /// Removes the board along with its columns, tasks and members.
    pub async fn delete_board(&mut self, id: &str) -> StoreResult<()> {
        self.begin();
        let result = self.client.delete_board(id).await.map_err(StoreError::from);
        if result.is_ok() {
            info!("Deleted board {}", id);
            self.commit(|state| state.remove_board(id));
        }
        self.finish(result)
    }

    /// Flips the starred flag locally, then merges the server's answer. The
    /// previous flag is restored when the call fails.
    pub async fn star_board(&mut self, id: &str) -> StoreResult<Board> {
        let previous = self
            .state
            .board(id)
            .map(|b| b.starred)
            .ok_or_else(|| StoreError::not_loaded("board", id));
        let previous = match previous {
            Ok(previous) => previous,
            Err(e) => return self.finish(Err(e)),
        };

        self.begin();
        self.set_starred(id, !previous);
        let result = self.client.star_board(id).await.map_err(StoreError::from);
        match &result {
            Ok(board) => {
                let board = board.clone();
                self.commit(|state| state.upsert_board(board));
            }
            Err(_) => self.set_starred(id, previous),
        }
        self.finish(result)
    }

    fn set_starred(&mut self, id: &str, starred: bool) {
        self.commit(|state| {
            if let Some(board) = state.boards.iter_mut().find(|b| b.id == id) {
                board.starred = starred;
            }
        });
    }
}
