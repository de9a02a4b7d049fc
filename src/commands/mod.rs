//! Command dispatcher.
//!
//! A POST body is an `action` tag plus the fields of that action. Each domain
//! models its actions as a closed enum; parsing happens in two steps so an
//! unknown tag is reported as such instead of as a generic deserialization
//! failure, and a missing field is reported by name.

pub mod attendance;
pub mod budget;
pub mod expense;
pub mod habit;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::progress::ProgressError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("unknown action: {0}")]
    InvalidAction(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field value: {0}")]
    InvalidField(String),

    #[error(transparent)]
    Rejected(#[from] ProgressError),
}

/// A closed set of actions accepted by one domain endpoint
pub trait Command: DeserializeOwned {
    /// Wire names of every variant
    const ACTIONS: &'static [&'static str];

    /// Checks that need no stored state
    fn validate(&self) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Parses and validates a command body
pub fn parse_command<C: Command>(body: &[u8]) -> Result<C, CommandError> {
    let value = parse_object(body)?;

    let action = match value.get("action") {
        Some(Value::String(action)) => action.as_str(),
        Some(other) => return Err(CommandError::InvalidAction(other.to_string())),
        None => return Err(CommandError::InvalidAction(String::new())),
    };
    if !C::ACTIONS.contains(&action) {
        return Err(CommandError::InvalidAction(action.to_string()));
    }

    let command: C = from_object(value)?;
    command.validate()?;
    Ok(command)
}

/// Parses a body without an action tag, such as a delete request
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, CommandError> {
    from_object(parse_object(body)?)
}

/// Serializes a record for the envelope's `data` field
pub fn to_data<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Failed to serialize response data: {}", e);
        ApiError::internal_server_error("Failed to serialize response data", Some(e.to_string()))
    })
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, CommandError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut object)) => {
            // An explicit null counts as absent
            object.retain(|_, value| !value.is_null());
            Ok(object)
        }
        Ok(_) => Err(CommandError::InvalidJson("expected a JSON object".to_string())),
        Err(e) => Err(CommandError::InvalidJson(e.to_string())),
    }
}

fn from_object<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, CommandError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| classify(&e))
}

fn classify(err: &serde_json::Error) -> CommandError {
    let message = err.to_string();
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(field, _)| field.to_string());

    match missing {
        Some(field) => CommandError::MissingField(field),
        None => CommandError::InvalidField(message),
    }
}

/// Maps a store failure to the envelope, naming the failed operation if the store itself broke
pub(crate) fn failure(message: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| ApiError::from(err).on_failure(message)
}

/// Rejects an empty or whitespace-only title
pub(crate) fn require_title(title: &str) -> Result<(), CommandError> {
    if title.trim().is_empty() {
        return Err(CommandError::MissingField("title".to_string()));
    }
    Ok(())
}
