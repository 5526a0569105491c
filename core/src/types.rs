//! Domain types for the todo API.
//!
//! # Design
//! Request payloads deserialize leniently: a missing `title` becomes an empty
//! string so that "missing" and "empty" fail the same way. `validate` is the
//! only route from a payload to the typed values the persistence layer takes,
//! so an unchecked title can never reach storage.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single todo item as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for `POST /api/todos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
}

/// Request payload for `PUT /api/todos/{id}`. Both fields overwrite the
/// stored values; this is not a partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A title known to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Rejects titles that are empty or only whitespace, so `"   "` is a
    /// validation failure. Accepted titles are kept exactly as submitted.
    pub fn parse(raw: String) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validated contents of an update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Title,
    pub completed: bool,
}

impl CreateTodo {
    pub fn validate(self) -> Result<Title, ValidationError> {
        Title::parse(self.title)
    }
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoChanges, ValidationError> {
        Ok(TodoChanges {
            title: Title::parse(self.title)?,
            completed: self.completed,
        })
    }
}

/// Decode a JSON request body regardless of the declared content type.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ValidationError> {
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedJson(e.to_string()))
}

/// Parse the `{id}` path segment.
pub fn parse_todo_id(raw: &str) -> Result<i64, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidId(raw.to_string()))
}
