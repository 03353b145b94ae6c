//! Error types for the cloud print client.
//!
//! # Design
//! Every failure the client can produce lands in `PrintError`, whether it was
//! detected locally (missing token, empty printer id, unreadable file), by the
//! HTTP layer (4xx/5xx status) or by the service itself (`success: false`
//! envelope). Each variant carries the numeric or textual code that the
//! reporting policy prints next to the message.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code attached to a failure.
///
/// The service sends `errorCode` either as a number or as a string, so both
/// shapes are kept as-is rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl ErrorCode {
    /// `true` for `0`, `""` and `"0"`, the codes that are not worth printing.
    pub fn is_empty(&self) -> bool {
        match self {
            ErrorCode::Number(n) => *n == 0,
            ErrorCode::Text(s) => s.is_empty() || s == "0",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ErrorCode::Number(n) => Some(*n),
            ErrorCode::Text(s) => s.parse().ok(),
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Number(0)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{n}"),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(n: i64) -> Self {
        ErrorCode::Number(n)
    }
}

impl From<u16> for ErrorCode {
    fn from(n: u16) -> Self {
        ErrorCode::Number(i64::from(n))
    }
}

/// Errors produced by `PrintClient` and `CloudPrintApi`.
#[derive(Debug, Error)]
pub enum PrintError {
    /// The client was built without an auth token.
    #[error("{0}")]
    Configuration(String),

    /// A required call argument was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// A local file could not be read or was empty.
    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// The server answered with a 4xx/5xx status. `body` is the raw response.
    #[error("{body}")]
    Transport { status: u16, body: String },

    /// Well-formed envelope with a falsy or missing `success` flag.
    #[error("{message}")]
    Application { message: String, code: ErrorCode },

    /// The transport could not complete the exchange at all.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body was not the JSON object the operation expected.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl PrintError {
    pub fn missing_token() -> Self {
        PrintError::Configuration("Authentication token required".to_string())
    }

    pub fn missing_printer_id() -> Self {
        PrintError::Validation("Printer ID required".to_string())
    }

    pub fn empty_content() -> Self {
        PrintError::Validation("Empty content".to_string())
    }

    pub fn unreadable_file(source: Option<io::Error>) -> Self {
        PrintError::Io {
            message: "Can't read file contents".to_string(),
            source,
        }
    }

    /// Code reported alongside the message.
    pub fn code(&self) -> ErrorCode {
        match self {
            PrintError::Configuration(_) | PrintError::Validation(_) => ErrorCode::Number(400),
            PrintError::Io { .. } => ErrorCode::Number(500),
            PrintError::Transport { status, .. } => ErrorCode::from(*status),
            PrintError::Application { code, .. } => code.clone(),
            PrintError::Connection(_) | PrintError::Decode(_) | PrintError::Serialization(_) => {
                ErrorCode::default()
            }
        }
    }

    /// The bare message, without the code prefix.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
