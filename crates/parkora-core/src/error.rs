//! Error types module
//!
//! All failures that cross a crate boundary are unified under [`ClientError`].
//! Transport variants display the exact message obtained from the remote side
//! (or its generic fallback) so callers can surface `err.to_string()` verbatim.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a dropped connection
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be treated by callers
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the user can retry the same action
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure to decode a compact signed token.
///
/// Any of these means the session is invalid; none of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token must have three segments, found {0}")]
    Malformed(usize),

    #[error("Token payload is not valid base64url: {0}")]
    Base64(String),

    #[error("Token payload is not valid UTF-8")]
    Utf8,

    #[error("Token claims could not be parsed: {0}")]
    Claims(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("{0}")]
    Validation(String),

    /// Non-2xx response; `message` is already normalized.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response")]
    ParseResponse,

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Aborted(String),

    /// The server answered 2xx but refused the credentials or gave no token.
    #[error("{0}")]
    Unauthorized(String),

    /// The server answered 2xx but the upload descriptor reports a failure.
    #[error("{0}")]
    UploadRejected(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// True for errors produced by the HTTP round-trip itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http { .. }
                | ClientError::ParseResponse
                | ClientError::Network(_)
                | ClientError::Aborted(_)
        )
    }

    /// HTTP status if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        ClientError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn client_error_static_metadata(err: &ClientError) -> (&'static str, bool, LogLevel) {
    match err {
        ClientError::Token(_) => ("INVALID_TOKEN", false, LogLevel::Warn),
        ClientError::TokenExpired => ("TOKEN_EXPIRED", false, LogLevel::Debug),
        ClientError::Validation(_) => ("VALIDATION_ERROR", false, LogLevel::Debug),
        ClientError::Http { status, .. } if *status >= 500 => ("HTTP_ERROR", true, LogLevel::Error),
        ClientError::Http { .. } => ("HTTP_ERROR", true, LogLevel::Warn),
        ClientError::ParseResponse => ("PARSE_RESPONSE_ERROR", true, LogLevel::Error),
        ClientError::Network(_) => ("NETWORK_ERROR", true, LogLevel::Warn),
        ClientError::Aborted(_) => ("ABORTED", true, LogLevel::Debug),
        ClientError::Unauthorized(_) => ("UNAUTHORIZED", false, LogLevel::Debug),
        ClientError::UploadRejected(_) => ("UPLOAD_REJECTED", true, LogLevel::Warn),
        ClientError::Storage(_) => ("STORAGE_ERROR", false, LogLevel::Error),
        ClientError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
        ClientError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        client_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).2
    }
}

/// Emit `error` through tracing at the level its metadata asks for.
pub fn log_client_error(error: &ClientError, context: &str) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code = code, "{}", context);
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code = code, "{}", context);
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code = code, "{}", context);
        }
    }
}
