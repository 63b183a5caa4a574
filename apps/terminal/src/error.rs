//! # App Error Type
//!
//! Unified error type for shell commands and startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  press / fill / startup                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ─┐                                                     │
//! │  ClientError ─────┼──► AppError { code, message } ──► "! message"       │
//! │  std::io::Error ──┘                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order submission failures never reach here: checkout reports them on the
//! contacts screen.
//!
//! Serializable so a scripted session can read `code` programmatically.

use serde::Serialize;
use storefront_client::ClientError;
use storefront_core::ValidationError;

/// Error returned by shell commands.
///
/// ```json
/// { "code": "CONTROL_DISABLED", "message": "'pay' is disabled" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input did not parse as a command
    UnknownCommand,

    /// No visible control with that key or field
    UnknownControl,

    /// Control exists but is disabled
    ControlDisabled,

    /// Buyer input rejected
    Validation,

    /// Store unreachable or timed out
    Network,

    /// Store answered with an error
    Api,

    /// Configuration invalid or unreadable
    Config,

    /// Anything else
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_command(input: &str) -> Self {
        AppError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command '{}'. Type 'help'.", input),
        )
    }

    pub fn unknown_control(what: impl std::fmt::Display) -> Self {
        AppError::new(ErrorCode::UnknownControl, format!("Nothing to act on: '{}'", what))
    }

    pub fn disabled(key: &str) -> Self {
        AppError::new(ErrorCode::ControlDisabled, format!("'{}' is disabled", key))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(ErrorCode::Validation, err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::RequestFailed(_) | ClientError::Timeout(_) => ErrorCode::Network,
            ClientError::Api { .. } | ClientError::ResponseParseFailed(_) => ErrorCode::Api,
            e if e.is_config_error() => ErrorCode::Config,
            _ => ErrorCode::Internal,
        };
        if code == ErrorCode::Config {
            // Config errors name the offending value.
            return AppError::new(code, err.to_string());
        }
        tracing::debug!(error = %err, "Store request failed");
        AppError::new(code, err.user_message())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Internal, format!("Terminal I/O failed: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
