use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::Column;
use crate::ordering::PositionUpdate;
use crate::COLUMNS_API;

// * Types ....................................................................

#[derive(Debug, Clone, Serialize)]
pub struct CreateColumnRequest {
    pub board_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateColumnRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReorderColumnsRequest {
    pub board_id: String,
    pub columns: Vec<PositionUpdate>,
}

// * Client ...................................................................

impl ApiClient {
    pub async fn fetch_columns(&self, board_id: &str) -> Result<Vec<Column>, ApiError> {
        let builder = self.request(Method::GET, &format!("{COLUMNS_API}/{}", urlencoding::encode(board_id)));
        self.send_list(builder).await
    }

    pub async fn create_column(&self, column: &CreateColumnRequest) -> Result<Column, ApiError> {
        let builder = self.request(Method::POST, COLUMNS_API).json(column);
        self.send_one(builder).await
    }

    pub async fn update_column(
        &self,
        id: &str,
        patch: &UpdateColumnRequest,
    ) -> Result<Column, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("{COLUMNS_API}/{}", urlencoding::encode(id)))
            .json(patch);
        self.send_one(builder).await
    }

    pub async fn delete_column(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("{COLUMNS_API}/{}", urlencoding::encode(id)));
        self.send_empty(builder).await
    }

    pub async fn reorder_columns(&self, request: &ReorderColumnsRequest) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &format!("{COLUMNS_API}/reorder"))
            .json(request);
        self.send_empty(builder).await
    }
}
