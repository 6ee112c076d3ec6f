//! Parse-or-reject gate for payloads coming back from the backend.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::models::{Board, Column, Member, Notification, Task, User};

#[derive(Error, Debug)]
#[error("Invalid {kind} at index {index}: {reason}")]
pub struct ValidationError {
    pub kind: &'static str,
    pub index: usize,
    pub reason: String,
}

/// What to do with a malformed entity inside a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Reject the whole response.
    #[default]
    Strict,
    /// Drop the entity and log a warning.
    Lenient,
}

impl ValidationMode {
    /// Strict while developing, lenient in release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "lenient" => Ok(ValidationMode::Lenient),
            other => Err(format!("unknown validation mode '{other}'")),
        }
    }
}

/// Shape checks serde cannot express.
pub trait Validate {
    const KIND: &'static str;

    fn validate(&self) -> Result<(), String>;
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}

impl Validate for User {
    const KIND: &'static str = "user";

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("email", &self.email)
    }
}

impl Validate for Board {
    const KIND: &'static str = "board";

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("title", &self.title)
    }
}

impl Validate for Column {
    const KIND: &'static str = "column";

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("board_id", &self.board_id)?;
        if self.position < 0 {
            return Err(format!("negative position {}", self.position));
        }
        Ok(())
    }
}

impl Validate for Task {
    const KIND: &'static str = "task";

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("column_id", &self.column_id)?;
        require("title", &self.title)?;
        if self.position < 0 {
            return Err(format!("negative position {}", self.position));
        }
        Ok(())
    }
}

impl Validate for Member {
    const KIND: &'static str = "member";

    fn validate(&self) -> Result<(), String> {
        require("user_id", &self.user_id)?;
        require("board_id", &self.board_id)
    }
}

impl Validate for Notification {
    const KIND: &'static str = "notification";

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)
    }
}

fn check<T: DeserializeOwned + Validate>(value: Value, index: usize) -> Result<T, ValidationError> {
    let entity: T = serde_json::from_value(value).map_err(|e| ValidationError {
        kind: T::KIND,
        index,
        reason: e.to_string(),
    })?;
    entity.validate().map_err(|reason| ValidationError {
        kind: T::KIND,
        index,
        reason,
    })?;
    Ok(entity)
}

pub fn parse_one<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ValidationError> {
    check(value, 0)
}

pub fn parse_list<T: DeserializeOwned + Validate>(
    values: Vec<Value>,
    mode: ValidationMode,
) -> Result<Vec<T>, ValidationError> {
    let mut entities = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match check::<T>(value, index) {
            Ok(entity) => entities.push(entity),
            Err(e) if mode == ValidationMode::Lenient => {
                warn!("Dropping malformed {} from response: {}", T::KIND, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(entities)
}
