//! Inbound message validation and normalization

use crate::domain::errors::DomainError;

/// Error text returned to callers for a missing or blank message
pub const MESSAGE_REQUIRED: &str = "Message is required!";

/// Reject an absent or whitespace-only message.
///
/// Returns the message untouched; the caller keeps the raw text for logging
/// and prompt building.
pub fn require_message(message: Option<&str>) -> Result<&str, DomainError> {
    match message {
        Some(m) if !m.trim().is_empty() => Ok(m),
        _ => Err(DomainError::InvalidInput(MESSAGE_REQUIRED.to_string())),
    }
}

/// Normalize a message for knowledge-base lookup: trim and drop quote and NUL characters.
pub fn normalize_message(message: &str) -> String {
    message
        .trim()
        .chars()
        .filter(|c| !matches!(*c, '\'' | '"' | '\0'))
        .collect::<String>()
        .trim()
        .to_string()
}
