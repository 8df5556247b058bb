//! Error types module
//!
//! This module provides the core error types used throughout imgkeep.
//! Every repository, collaborator and workflow reports failures as an
//! `AppError`; failures of the external resize service are carried as a typed
//! `ResizeError` inside it so callers can still inspect the remote status.
//!
//! The `Database` variant carries a `sqlx::Error` only when the `sqlx` feature
//! is enabled; without it the variant holds a plain message.

use std::error::Error as StdError;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Boxed cause attached to remote request failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like remote rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// at the HTTP boundary.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_ARGUMENT")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

fn describe_status(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

/// Failure reported by the external resize service client.
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    #[error(
        "{{url: {url}, status: {}, message: {message}, body: {body}}}",
        describe_status(.status_code)
    )]
    BadRequest {
        url: String,
        status_code: Option<u16>,
        message: String,
        body: String,
        #[source]
        cause: Option<BoxError>,
    },

    #[error(
        "{{url: {url}, status: {}, message: {message}}}",
        describe_status(.status_code)
    )]
    Forbidden {
        url: String,
        status_code: Option<u16>,
        message: String,
        body: String,
        #[source]
        cause: Option<BoxError>,
    },
}

impl ResizeError {
    pub fn bad_request(
        url: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
        body: impl Into<String>,
        cause: Option<BoxError>,
    ) -> Self {
        ResizeError::BadRequest {
            url: url.into(),
            status_code,
            message: message.into(),
            body: body.into(),
            cause,
        }
    }

    pub fn forbidden(
        url: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
        body: impl Into<String>,
        cause: Option<BoxError>,
    ) -> Self {
        ResizeError::Forbidden {
            url: url.into(),
            status_code,
            message: message.into(),
            body: body.into(),
            cause,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ResizeError::BadRequest { url, .. } | ResizeError::Forbidden { url, .. } => url,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResizeError::BadRequest { status_code, .. }
            | ResizeError::Forbidden { status_code, .. } => *status_code,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            ResizeError::BadRequest { body, .. } | ResizeError::Forbidden { body, .. } => body,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ResizeError::Forbidden { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate, already exists: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Resize(#[from] ResizeError),

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidArgument(format!("Invalid uuid: {}", err))
    }
}

impl AppError {
    /// Wrap this error with step context, rendered as `"<context>: <error>"`.
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error beneath any `Context` layers.
    pub fn root(&self) -> &AppError {
        let mut current = self;
        while let AppError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root(), AppError::InvalidArgument(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self.root(), AppError::Forbidden(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), AppError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.root(), AppError::Duplicate(_))
    }

    /// The remote resize failure beneath any context, if that is what this is.
    pub fn as_resize_error(&self) -> Option<&ResizeError> {
        match self.root() {
            AppError::Resize(err) => Some(err),
            _ => None,
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self.root() {
            AppError::Database(_) => "Database",
            AppError::InvalidArgument(_) => "InvalidArgument",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::Duplicate(_) => "Duplicate",
            AppError::Resize(ResizeError::BadRequest { .. }) => "ResizeBadRequest",
            AppError::Resize(ResizeError::Forbidden { .. }) => "ResizeForbidden",
            AppError::IdentityProvider(_) => "IdentityProvider",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
            AppError::Context { .. } => "Context",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

/// Static metadata for each kind: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err.root() {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::InvalidArgument(_) => (400, "INVALID_ARGUMENT", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Duplicate(_) => (400, "DUPLICATE", false, LogLevel::Debug),
        AppError::Resize(ResizeError::Forbidden { .. }) => {
            (403, "RESIZE_FORBIDDEN", false, LogLevel::Warn)
        }
        AppError::Resize(ResizeError::BadRequest { .. }) => {
            (502, "RESIZE_SERVICE_ERROR", true, LogLevel::Error)
        }
        AppError::IdentityProvider(_) => (502, "IDENTITY_PROVIDER_ERROR", true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } | AppError::Context { .. } => {
            (500, "INTERNAL_ERROR", true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self.root() {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::InvalidArgument(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Duplicate(msg) => format!("Duplicate, already exists: {}", msg),
            AppError::Resize(ResizeError::Forbidden { .. }) => {
                "Image service refused the request".to_string()
            }
            AppError::Resize(ResizeError::BadRequest { .. }) => {
                "Image service request failed".to_string()
            }
            AppError::IdentityProvider(_) => "Failed to resolve user identity".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } | AppError::Context { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
