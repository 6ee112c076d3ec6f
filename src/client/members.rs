use reqwest::Method;
use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::models::{Member, Role};
use crate::MEMBERS_API;

#[derive(Debug, Clone, Serialize)]
pub struct AddMemberRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMemberRequest {
    pub role: Role,
}

fn member_path(board_id: &str, user_id: &str) -> String {
    format!(
        "{MEMBERS_API}/{}/{}",
        urlencoding::encode(board_id),
        urlencoding::encode(user_id)
    )
}

impl ApiClient {
    pub async fn fetch_members(&self, board_id: &str) -> Result<Vec<Member>, ApiError> {
        let builder = self.request(Method::GET, &format!("{MEMBERS_API}/{}", urlencoding::encode(board_id)));
        self.send_list(builder).await
    }

    pub async fn add_member(
        &self,
        board_id: &str,
        request: &AddMemberRequest,
    ) -> Result<Member, ApiError> {
        let builder = self
            .request(Method::POST, &format!("{MEMBERS_API}/{}", urlencoding::encode(board_id)))
            .json(request);
        self.send_one(builder).await
    }

    pub async fn update_member(
        &self,
        board_id: &str,
        user_id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<Member, ApiError> {
        let builder = self
            .request(Method::PUT, &member_path(board_id, user_id))
            .json(request);
        self.send_one(builder).await
    }

    pub async fn remove_member(&self, board_id: &str, user_id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &member_path(board_id, user_id));
        self.send_empty(builder).await
    }
}
