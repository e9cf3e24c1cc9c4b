//! Error types for shredding

use thiserror::Error;

/// Shredding error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShredError {
    /// Envelope text is not valid JSON or lacks a `data` field of the shape
    /// expected by the shredding mode.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// One or more sub-documents failed validation. Messages are kept in
    /// input order, one per malformed entry, and the list is never empty.
    #[error("Shredding failed with {} error(s): {}", .messages.len(), .messages.join("; "))]
    Shredding {
        /// Per-entry failure messages
        messages: Vec<String>,
    },
    /// A configured input limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

impl ShredError {
    /// Per-entry messages carried by a [`ShredError::Shredding`] failure.
    ///
    /// Structural failures carry no entry messages and return an empty slice.
    pub fn messages(&self) -> &[String] {
        match self {
            ShredError::Shredding { messages } => messages,
            _ => &[],
        }
    }

    /// Whether resubmitting the same input could succeed. Always false:
    /// shredding is a pure function of its input.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<serde_json::Error> for ShredError {
    fn from(err: serde_json::Error) -> Self {
        ShredError::MalformedInput(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ShredError>;
