//! Error types for the fallible conversion entry points.

use crate::message::Message;
use thiserror::Error;

/// Errors returned by `to_json`, `to_yaml` and schema construction.
///
/// Diagnostics inside a document are reported as [`Message`] values, never as
/// errors; this type only covers operations that need a usable value tree and
/// cannot produce one.
#[derive(Error, Debug)]
pub enum KsonError {
    /// The input could not be parsed into a value tree.
    /// Carries the 1-based line of the first error and its rendered text.
    #[error("KSON parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The schema document could not be parsed or is not usable.
    #[error("schema error: {0}")]
    Schema(String),

    /// JSON interop failure (bridging through `serde_json`).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KsonError {
    /// Build a `Parse` error from the first error-severity message.
    pub(crate) fn from_messages(messages: &[Message]) -> KsonError {
        let first = messages
            .iter()
            .find(|m| m.severity == crate::message::Severity::Error)
            .or_else(|| messages.first());
        match first {
            Some(m) => KsonError::Parse {
                line: m.location.start.line as usize + 1,
                message: m.to_string(),
            },
            None => KsonError::Parse {
                line: 1,
                message: "unknown parse failure".to_string(),
            },
        }
    }
}

/// Convenience alias used throughout kson-core.
pub type Result<T> = std::result::Result<T, KsonError>;
