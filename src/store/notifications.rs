use super::{ResourceKey, Store, StoreError, StoreResult};

impl Store {
    pub async fn fetch_notifications(&mut self) -> StoreResult<()> {
        if !self.begin_fetch(&ResourceKey::Notifications) {
            return Ok(());
        }
        let result = self.client.fetch_notifications().await.map_err(StoreError::from);
        let result = match result {
            Ok(mut notifications) => {
                // Newest first
                notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                self.commit(|state| {
                    state.notifications = notifications;
                    state.cache.mark_fresh(ResourceKey::Notifications);
                });
                Ok(())
            }
            Err(e) => {
                self.commit(|state| state.cache.mark_failed(ResourceKey::Notifications));
                Err(e)
            }
        };
        self.finish(result)
    }

    pub async fn mark_notification_read(&mut self, id: &str) -> StoreResult<()> {
        self.begin();
        let result = self
            .client
            .mark_notification_read(id)
            .await
            .map_err(StoreError::from);
        if result.is_ok() {
            self.commit(|state| {
                if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                    n.read = true;
                }
            });
        }
        self.finish(result)
    }

    pub async fn mark_all_notifications_read(&mut self) -> StoreResult<()> {
        self.begin();
        let result = self
            .client
            .mark_all_notifications_read()
            .await
            .map_err(StoreError::from);
        if result.is_ok() {
            self.commit(|state| {
                for n in state.notifications.iter_mut() {
                    n.read = true;
                }
            });
        }
        self.finish(result)
    }

    pub async fn delete_notification(&mut self, id: &str) -> StoreResult<()> {
        self.begin();
        let result = self.client.delete_notification(id).await.map_err(StoreError::from);
        if result.is_ok() {
            self.commit(|state| state.notifications.retain(|n| n.id != id));
        }
        self.finish(result)
    }
}
