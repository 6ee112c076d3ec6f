use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{Board, Priority};
use crate::BOARDS_API;

// * Types ....................................................................

#[derive(Debug, Clone, Serialize, Default)]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial patch; only the fields that are `Some` are sent.
#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateBoardRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateBoardRequest {
    /// Applies the patch to a local copy, used for optimistic updates.
    pub fn apply_to(&self, board: &mut Board) {
        if let Some(title) = &self.title {
            board.title = title.clone();
        }
        if let Some(description) = &self.description {
            board.description = Some(description.clone());
        }
        if let Some(priority) = self.priority {
            board.priority = priority;
        }
        if let Some(color) = &self.color {
            board.color = Some(color.clone());
        }
    }
}

// * Client ...................................................................

impl ApiClient {
    pub async fn fetch_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.send_list(self.request(Method::GET, BOARDS_API)).await
    }

    pub async fn fetch_board(&self, id: &str) -> Result<Board, ApiError> {
        let builder = self.request(Method::GET, &format!("{BOARDS_API}/{}", urlencoding::encode(id)));
        self.send_one(builder).await
    }

    pub async fn create_board(&self, board: &CreateBoardRequest) -> Result<Board, ApiError> {
        let builder = self.request(Method::POST, BOARDS_API).json(board);
        self.send_one(builder).await
    }

    pub async fn update_board(
        &self,
        id: &str,
        patch: &UpdateBoardRequest,
    ) -> Result<Board, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("{BOARDS_API}/{}", urlencoding::encode(id)))
            .json(patch);
        self.send_one(builder).await
    }

    pub async fn delete_board(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("{BOARDS_API}/{}", urlencoding::encode(id)));
        self.send_empty(builder).await
    }

    /// Toggles the starred flag server side and returns the updated board.
    pub async fn star_board(&self, id: &str) -> Result<Board, ApiError> {
        let builder = self.request(Method::POST, &format!("{BOARDS_API}/{}/star", urlencoding::encode(id)));
        self.send_one(builder).await
    }
}
