//! Error types for kbank.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias using kbank's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for kbank operations.
///
/// Each variant is a distinct failure class so callers can tell
/// "your input was invalid" apart from "the server rejected this" and
/// "the network failed".
#[derive(Error, Debug)]
pub enum Error {
    /// Decoded JSON (or a local input) does not conform to a schema
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Envelope parsed but carried `success = false`
    #[error("Application error [{code}]: {message}")]
    Application { code: String, message: String },

    /// Transport failed before an envelope could be parsed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Local name check failed; never reaches the network
    #[error("Name rejected: {name:?} contains {}", format_illegal(.illegal))]
    NameRejected { name: String, illegal: Vec<char> },

    /// Caller aborted the call
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn application(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Application {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Error::Application { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_name_rejected(&self) -> bool {
        matches!(self, Error::NameRejected { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Backend code for application errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Application { code, .. } => Some(code),
            _ => None,
        }
    }
}

fn format_illegal(illegal: &[char]) -> String {
    illegal
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Transport-level failure. Carries minimal detail and never partial data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The per-call timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Unexpected HTTP status without a failure envelope
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body was not JSON
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// Any other request failure
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_decode() || e.is_body() {
            TransportError::InvalidBody(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.into())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::InvalidBody(e.to_string())
    }
}
