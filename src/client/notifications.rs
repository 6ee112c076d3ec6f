use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::Notification;
use crate::NOTIFICATIONS_API;

impl ApiClient {
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.send_list(self.request(Method::GET, NOTIFICATIONS_API)).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, &format!("{NOTIFICATIONS_API}/{}/read", urlencoding::encode(id)));
        self.send_empty(builder).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, &format!("{NOTIFICATIONS_API}/read-all"));
        self.send_empty(builder).await
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("{NOTIFICATIONS_API}/{}", urlencoding::encode(id)));
        self.send_empty(builder).await
    }
}
