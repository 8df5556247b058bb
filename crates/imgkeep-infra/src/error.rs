//! HTTP error response conversion
//!
//! This module provides the ErrorResponse body returned at the HTTP boundary.
//! Status codes and messages come from the `ErrorMetadata` implementation of
//! `AppError`.

use imgkeep_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Build the response body and log the error at its configured level.
    pub fn from_app_error(err: &AppError) -> (u16, Self) {
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(error = %err, "Request failed"),
            LogLevel::Warn => tracing::warn!(error = %err, "Request failed"),
            LogLevel::Error => tracing::error!(
                error = %err,
                details = %err.detailed_message(),
                "Request failed"
            ),
        }

        let error = err.client_message();
        let details = if err.is_sensitive() {
            None
        } else {
            Some(err.to_string()).filter(|message| *message != error)
        };

        (
            err.http_status_code(),
            Self {
                error,
                code: err.error_code(),
                details,
            },
        )
    }
}
