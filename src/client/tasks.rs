use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::{Priority, Task, TaskStatus};
use crate::TASKS_API;

// * Types ....................................................................

#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub column_id: String,
    pub board_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub assignees: Vec<String>,
    pub tags: Vec<String>,
    pub position: i32,
}

impl CreateTaskRequest {
    pub fn new(board_id: &str, column_id: &str, title: &str) -> Self {
        Self {
            column_id: column_id.to_string(),
            board_id: board_id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: None,
            assignees: Vec::new(),
            tags: Vec::new(),
            position: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveTaskRequest {
    pub task_id: String,
    pub source_column_id: String,
    pub target_column_id: String,
    pub new_position: i32,
}

// * Client ...................................................................
// ** Flat Functions ..........................................................

impl ApiClient {
    pub async fn fetch_tasks(&self, column_id: &str) -> Result<Vec<Task>, ApiError> {
        let builder = self.request(Method::GET, &format!("{TASKS_API}/{}", urlencoding::encode(column_id)));
        self.send_list(builder).await
    }

    pub async fn fetch_all_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let builder = self.request(Method::GET, &format!("{TASKS_API}/getAllTasks"));
        self.send_list(builder).await
    }

    pub async fn fetch_task(&self, id: &str) -> Result<Task, ApiError> {
        let builder = self.request(Method::GET, &format!("{TASKS_API}/details/{}", urlencoding::encode(id)));
        self.send_one(builder).await
    }

    pub async fn create_task(&self, task: &CreateTaskRequest) -> Result<Task, ApiError> {
        let builder = self.request(Method::POST, TASKS_API).json(task);
        self.send_one(builder).await
    }

    pub async fn update_task(&self, id: &str, patch: &UpdateTaskRequest) -> Result<Task, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("{TASKS_API}/{}", urlencoding::encode(id)))
            .json(patch);
        self.send_one(builder).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("{TASKS_API}/{}", urlencoding::encode(id)));
        self.send_empty(builder).await
    }

    pub async fn move_task(&self, request: &MoveTaskRequest) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &format!("{TASKS_API}/move"))
            .json(request);
        self.send_empty(builder).await
    }

    // ** Assignees and Tags ....................................................

    pub async fn add_assignee(&self, task_id: &str, user_id: &str) -> Result<Task, ApiError> {
        let builder = self
            .request(Method::POST, &format!("{TASKS_API}/{}/assignees", urlencoding::encode(task_id)))
            .json(&json!({ "user_id": user_id }));
        self.send_one(builder).await
    }

    pub async fn remove_assignee(&self, task_id: &str, user_id: &str) -> Result<Task, ApiError> {
        let builder = self.request(
            Method::DELETE,
            &format!(
                "{TASKS_API}/{}/assignees/{}",
                urlencoding::encode(task_id),
                urlencoding::encode(user_id)
            ),
        );
        self.send_one(builder).await
    }

    pub async fn add_tag(&self, task_id: &str, tag: &str) -> Result<Task, ApiError> {
        let builder = self
            .request(Method::POST, &format!("{TASKS_API}/{}/tags", urlencoding::encode(task_id)))
            .json(&json!({ "tag": tag }));
        self.send_one(builder).await
    }

    pub async fn remove_tag(&self, task_id: &str, tag: &str) -> Result<Task, ApiError> {
        let builder = self.request(
            Method::DELETE,
            &format!(
                "{TASKS_API}/{}/tags/{}",
                urlencoding::encode(task_id),
                urlencoding::encode(tag)
            ),
        );
        self.send_one(builder).await
    }
}
