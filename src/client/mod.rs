pub mod auth;
pub mod boards;
pub mod columns;
pub mod members;
pub mod notifications;
pub mod tasks;

pub use auth::{AuthResponse, SignInRequest, SignUpRequest};
pub use boards::{CreateBoardRequest, UpdateBoardRequest};
pub use columns::{CreateColumnRequest, ReorderColumnsRequest, UpdateColumnRequest};
pub use members::{AddMemberRequest, UpdateMemberRequest};
pub use tasks::{CreateTaskRequest, MoveTaskRequest, UpdateTaskRequest};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::validation::{self, Validate, ValidationError, ValidationMode};
use crate::{BASE_URL, REQUEST_TIMEOUT_SECS};

// * Errors ...................................................................

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Could not decode response: {0}")]
    DecodeError(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err)
        }
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

// * Client ...................................................................

/// Thin wrapper over the backend's REST API. Holds the bearer token once
/// signed in and applies the request timeout to every call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    validation: ValidationMode,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Could not build HTTP client with a {:?} timeout, requests will not time out: {}", timeout, e);
                reqwest::Client::new()
            });
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            validation: ValidationMode::for_build(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    // ** Plumbing ..............................................................

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and turns any non-2xx status into an `ApiError`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        check_status(response).await
    }

    pub(crate) async fn send_one<T>(&self, builder: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let value = self.send(builder).await?.json::<Value>().await?;
        Ok(validation::parse_one(value)?)
    }

    pub(crate) async fn send_list<T>(&self, builder: RequestBuilder) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let values = self.send(builder).await?.json::<Vec<Value>>().await?;
        Ok(validation::parse_list(values, self.validation)?)
    }

    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        _ => ApiError::ServerError {
            status: status.as_u16(),
            message,
        },
    })
}

/// Pulls a human readable message out of an error body. Backends answer
/// with `{"message": ..}`, `{"error": ..}` or plain text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
