//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{TransportError, TreeError};

/// Map domain errors to a string for CLI output.
/// Validation failures list one field per line.
pub fn map_error(e: &TreeError) -> String {
    let validation = match e {
        TreeError::Validation(v) => Some(v),
        TreeError::Transport(TransportError::Validation(v)) => Some(v),
        _ => None,
    };
    match validation {
        Some(v) if !v.is_empty() => {
            let mut out = String::from("Validation failed:");
            for message in &v.messages {
                out.push_str(&format!("\n  {}: {}", message.location(), message.msg));
            }
            out
        }
        _ => e.to_string(),
    }
}
