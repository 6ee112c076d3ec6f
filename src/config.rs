use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::client::ApiClient;
use crate::validation::ValidationMode;
use crate::{BASE_URL, REQUEST_TIMEOUT_SECS};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// How ordering-sensitive mutations are committed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationMode {
    /// Apply first, re-apply the previous lists if the backend refuses.
    #[default]
    Optimistic,
    /// Apply only once the backend has acknowledged.
    Confirm,
}

impl FromStr for MutationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "optimistic" => Ok(MutationMode::Optimistic),
            "confirm" => Ok(MutationMode::Confirm),
            other => Err(format!("unknown mutation mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub token: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout: Duration,
    pub mutation_mode: MutationMode,
    pub validation: ValidationMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            token: None,
            session_file: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            mutation_mode: MutationMode::default(),
            validation: ValidationMode::for_build(),
        }
    }
}

impl Config {
    /// Reads `.env` (if present) and then the `KANBAN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("KANBAN_API_URL") {
            config.base_url = url;
        }
        config.token = lookup("KANBAN_TOKEN").filter(|t| !t.is_empty());
        config.session_file = lookup("KANBAN_SESSION_FILE").map(PathBuf::from);

        if let Some(secs) = lookup("KANBAN_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "KANBAN_TIMEOUT_SECS",
                reason: e.to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(mode) = lookup("KANBAN_MUTATION_MODE") {
            config.mutation_mode = mode
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "KANBAN_MUTATION_MODE",
                    reason,
                })?;
        }
        if let Some(mode) = lookup("KANBAN_VALIDATION") {
            config.validation = mode
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "KANBAN_VALIDATION",
                    reason,
                })?;
        }

        Ok(config)
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::with_timeout(&self.base_url, self.timeout)
            .with_token(self.token.clone())
            .with_validation(self.validation)
    }
}
