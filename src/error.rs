//! Error types for the lazy tree core and its transport.

use crate::types::{NodeId, ParentId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation message, as reported by the backend's
/// `422` body (`{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl FieldMessage {
    pub fn new(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec![serde_json::Value::String(field.to_string())],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }

    /// Dotted location path, e.g. `query.limit`
    pub fn location(&self) -> String {
        self.loc
            .iter()
            .map(|part| match part {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Malformed request parameters; carries one message per offending field
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", summarize(.messages))]
pub struct ValidationError {
    pub messages: Vec<FieldMessage>,
}

impl ValidationError {
    pub fn new(messages: Vec<FieldMessage>) -> Self {
        Self { messages }
    }

    pub fn single(field: &str, msg: impl Into<String>) -> Self {
        Self {
            messages: vec![FieldMessage::new(field, msg)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn summarize(messages: &[FieldMessage]) -> String {
    if messages.is_empty() {
        return "Validation failed".to_string();
    }
    let parts: Vec<String> = messages
        .iter()
        .map(|m| {
            let location = m.location();
            if location.is_empty() {
                m.msg.clone()
            } else {
                format!("{}: {}", location, m.msg)
            }
        })
        .collect();
    format!("Validation failed: {}", parts.join("; "))
}

/// Failure of the child-fetch or paging transport.
///
/// Kept `Clone` so a captured cause can live inside a cache entry and be
/// shown by every row that asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(ValidationError),

    #[error("No async runtime available to run the request: {0}")]
    Runtime(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<ValidationError> for TransportError {
    fn from(err: ValidationError) -> Self {
        TransportError::Validation(err)
    }
}

/// Internal inconsistency between a caller and the child cache. Not reachable
/// through correct use of the public API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheCoherenceError {
    #[error("Child list for parent {0} was never requested")]
    NeverRequested(ParentId),

    #[error("Node {0} is not present in any loaded child list")]
    UnknownNode(NodeId),
}

/// Top-level error for hosts, the CLI and configuration paths
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Cache coherence error: {0}")]
    Coherence(#[from] CacheCoherenceError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for TreeError {
    fn from(err: config::ConfigError) -> Self {
        TreeError::ConfigError(err.to_string())
    }
}
