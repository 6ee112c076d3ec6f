pub mod client;
pub mod config;
pub mod dnd;
pub mod models;
pub mod ordering;
pub mod selectors;
pub mod session;
pub mod store;
pub mod validation;

pub const BASE_URL: &str = "http://localhost:5000/api";
pub const AUTH_API: &str = "auth";
pub const BOARDS_API: &str = "boards";
pub const COLUMNS_API: &str = "columns";
pub const TASKS_API: &str = "tasks";
pub const MEMBERS_API: &str = "members";
pub const NOTIFICATIONS_API: &str = "notifications";

/// Requests that take longer than this fail with `ApiError::Timeout`.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
