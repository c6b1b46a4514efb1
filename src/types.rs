/// Serializable envelope for errors written in JSON output modes.
///
/// Events themselves are serialized straight from [`crate::ra::Event`].
use serde::{Deserialize, Serialize};

use crate::ra::RaError;

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from an `RaError`.
    #[must_use]
    pub fn from_ra_error(err: &RaError) -> Self {
        Self::new(err.code(), err.to_string())
    }

    /// Construct from a code and message.
    #[must_use]
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: message.into(),
            },
        }
    }
}
