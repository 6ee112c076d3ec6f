use tracing::info;

use super::{ResourceKey, Store, StoreError, StoreResult};
use crate::client::{AddMemberRequest, UpdateMemberRequest};
use crate::models::{Member, Role};

impl Store {
    pub async fn fetch_members(&mut self, board_id: &str) -> StoreResult<()> {
        let key = ResourceKey::Members(board_id.to_string());
        if !self.begin_fetch(&key) {
            return Ok(());
        }
        let result = self.client.fetch_members(board_id).await.map_err(StoreError::from);
        let result = match result {
            Ok(members) => {
                self.commit(|state| {
                    state.members.insert(board_id.to_string(), members);
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

    pub async fn add_member(&mut self, board_id: &str, email: &str, role: Role) -> StoreResult<Member> {
        self.begin();
        let request = AddMemberRequest {
            email: email.to_string(),
            role,
        };
        let result = self
            .client
            .add_member(board_id, &request)
            .await
            .map_err(StoreError::from);
        if let Ok(member) = &result {
            info!("Added {} to board {} as {}", member.user_id, board_id, member.role);
            let member = member.clone();
            self.commit(|state| upsert_member(state.members.entry(board_id.to_string()).or_default(), member));
        }
        self.finish(result)
    }

    pub async fn update_member_role(
        &mut self,
        board_id: &str,
        user_id: &str,
        role: Role,
    ) -> StoreResult<Member> {
        self.begin();
        let result = self
            .client
            .update_member(board_id, user_id, &UpdateMemberRequest { role })
            .await
            .map_err(StoreError::from);
        if let Ok(member) = &result {
            let member = member.clone();
            self.commit(|state| upsert_member(state.members.entry(board_id.to_string()).or_default(), member));
        }
        self.finish(result)
    }

    pub async fn remove_member(&mut self, board_id: &str, user_id: &str) -> StoreResult<()> {
        self.begin();
        let result = self
            .client
            .remove_member(board_id, user_id)
            .await
            .map_err(StoreError::from);
        if result.is_ok() {
            info!("Removed {} from board {}", user_id, board_id);
            self.commit(|state| {
                if let Some(members) = state.members.get_mut(board_id) {
                    members.retain(|m| m.user_id != user_id);
                }
                if let Some(board) = state.boards.iter_mut().find(|b| b.id == board_id) {
                    board.members.retain(|id| id != user_id);
                }
            });
        }
        self.finish(result)
    }
}

fn upsert_member(members: &mut Vec<Member>, member: Member) {
    match members.iter_mut().find(|m| m.user_id == member.user_id) {
        Some(existing) => *existing = member,
        None => members.push(member),
    }
}
