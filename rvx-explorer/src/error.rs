//! Backend failure types
//!
//! [`FetchError`] is what the transport returns. It never escapes a feed or
//! the comparison controller: both convert it into an [`ErrorPayload`] and
//! publish it in their view.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Backend request errors
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}")]
    Api {
        status: u16,
        /// Canonical reason phrase of `status`, when known
        reason: Option<String>,
        /// Decoded JSON body (a JSON string when the body was not JSON)
        body: Value,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Structured HTTP failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpFailure {
    pub status: u16,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Response body
    #[serde(default)]
    pub data: Value,
}

/// User-facing error state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorPayload {
    StringMessage { message: String },
    StructuredHttpError(HttpFailure),
    Unknown { value: Value },
}

impl ErrorPayload {
    pub fn message(message: impl Into<String>) -> Self {
        ErrorPayload::StringMessage {
            message: message.into(),
        }
    }

    /// Text shown to the user
    ///
    /// Extraction order: a plain message as-is, then the body's `detail`, the
    /// body's `message`, the failure's own `message`, the HTTP status message,
    /// and finally a JSON dump of whatever is left.
    pub fn display_message(&self) -> String {
        match self {
            ErrorPayload::StringMessage { message } => message.clone(),
            ErrorPayload::StructuredHttpError(failure) => {
                if let Some(text) = non_empty_text(failure.data.get("detail")) {
                    return text;
                }
                if let Some(text) = non_empty_text(failure.data.get("message")) {
                    return text;
                }
                if let Some(text) = failure.message.as_deref().filter(|m| !m.is_empty()) {
                    return text.to_string();
                }
                if let Some(text) = failure.status_message.as_deref().filter(|m| !m.is_empty()) {
                    return text.to_string();
                }
                serde_json::to_string(failure).unwrap_or_else(|_| format!("HTTP {}", failure.status))
            }
            ErrorPayload::Unknown { value } => match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

impl From<FetchError> for ErrorPayload {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(message) => ErrorPayload::StringMessage { message },
            FetchError::Api {
                status,
                reason,
                body,
            } => ErrorPayload::StructuredHttpError(HttpFailure {
                status,
                status_message: reason,
                message: None,
                data: body,
            }),
            FetchError::Parse(_) => ErrorPayload::StringMessage {
                message: err.to_string(),
            },
        }
    }
}

/// `detail` may be a string or a list of validation errors
fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
