use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiClient, ApiError};
use crate::models::User;
use crate::validation;
use crate::AUTH_API;

// * Types ....................................................................

#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// * Client ...................................................................

impl ApiClient {
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, ApiError> {
        let builder = self
            .request(Method::POST, &format!("{AUTH_API}/signin"))
            .json(request);
        self.auth_response(builder).await
    }

    /// A 409 here means the email is already registered.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        let builder = self
            .request(Method::POST, &format!("{AUTH_API}/signup"))
            .json(request);
        self.auth_response(builder).await
    }

    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, &format!("{AUTH_API}/profile"));
        self.send_one(builder).await
    }

    async fn auth_response(&self, builder: reqwest::RequestBuilder) -> Result<AuthResponse, ApiError> {
        let mut value = self.send(builder).await?.json::<Value>().await?;
        let token = value
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::DecodeError("auth response carries no token".to_string()))?;
        let user = validation::parse_one::<User>(value["user"].take())?;
        Ok(AuthResponse { token, user })
    }
}
