//! taskdeck error types
//!
//! Built on `thiserror`. Every error converts to
//! [`ErrorInfo`] (`{message, details}`) for display.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// taskdeck error
#[derive(Debug, Error)]
pub enum TaskError {
    /// Required input missing before a request (token, required fields)
    #[error("{0}")]
    Precondition(String),

    /// Non-2xx response from the server
    #[error("{message}")]
    Request {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The request itself failed (unreachable, timed out, ...)
    #[error("Unable to reach the server. Check your network connection.")]
    Transport(String),

    /// 2xx response whose body could not be decoded
    #[error("Unexpected response from server")]
    Decode(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// taskdeck Result alias
pub type Result<T> = std::result::Result<T, TaskError>;

impl TaskError {
    /// Create a Precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a Config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a Request error from the status code and response body
    pub fn request(status: u16, body: ErrorBody) -> Self {
        let server_message = body.message.or(body.code);
        let message = status_message(status, server_message.as_deref());
        // keep the raw server message in details when it differs from the mapped one
        let details = body
            .details
            .or_else(|| server_message.filter(|m| *m != message));
        Self::Request {
            status,
            message,
            details,
        }
    }

    /// Whether validation failed before any request was sent
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// `{message, details}` for display
    pub fn info(&self) -> ErrorInfo {
        let details = match self {
            Self::Request { details, .. } => details.clone(),
            Self::Transport(cause) | Self::Decode(cause) => Some(cause.clone()),
            _ => None,
        };
        ErrorInfo {
            message: self.to_string(),
            details,
        }
    }
}

/// Structured error for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&TaskError> for ErrorInfo {
    fn from(err: &TaskError) -> Self {
        err.info()
    }
}

/// Non-2xx response body
///
/// Usually `{message | code, details?}`; a non-JSON body becomes `details` as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
}

#[derive(Deserialize)]
struct RawErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parse the body, falling back to plain text when it is not JSON
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<RawErrorBody>(trimmed) {
            Ok(raw) => Self {
                message: raw.message.and_then(value_to_text),
                code: raw.code.and_then(value_to_text),
                details: raw.details.and_then(value_to_text),
            },
            Err(_) => Self {
                details: Some(trimmed.to_string()),
                ..Self::default()
            },
        }
    }
}

/// Render any JSON value as text (strings without quotes)
fn value_to_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Status code to user-facing message
fn status_message(status: u16, server_message: Option<&str>) -> String {
    match status {
        401 => "Your session has expired. Please log in again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested task could not be found.".to_string(),
        500 => "The server encountered an error. Please try again later.".to_string(),
        400 => server_message
            .map(String::from)
            .unwrap_or_else(|| "The request was invalid. Check the task details.".to_string()),
        _ => server_message
            .map(String::from)
            .unwrap_or_else(|| format!("Request failed with status {}", status)),
    }
}
