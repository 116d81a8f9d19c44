//! Error types for the API client

use serde_json::Value;
use std::time::Duration;
use sunpath_core::error::exit_codes;
use sunpath_core::i18n::{tf, t, Locale};
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// User-facing message derived from the body
        message: String,
    },

    /// Request did not complete in time
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before it was sent
    #[error(transparent)]
    Validation(#[from] sunpath_core::Error),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// Transport failures and 5xx statuses retry; 504 and timeouts do not,
    /// since the backend already spent its whole budget on the request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_timeout() && !e.is_builder(),
            Self::ApiResponse { status, .. } => is_retryable_status(*status),
            Self::Timeout(_)
            | Self::Config(_)
            | Self::Json(_)
            | Self::InvalidUrl(_)
            | Self::Validation(_) => false,
        }
    }

    /// HTTP status, when the backend answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message suitable for showing to the user
    #[must_use]
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            Self::Timeout(after) => format!(
                "Request timeout: {}",
                tf(locale, "errors.clientTimeout", &[("secs", &after.as_secs().to_string())])
            ),
            Self::Validation(e) => e.message.clone(),
            other => other.to_string(),
        }
    }

    /// Process exit code for this failure
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Timeout(_) => exit_codes::TIMEOUT,
            Self::Validation(_) => exit_codes::VALIDATION_ERROR,
            Self::Config(_) | Self::InvalidUrl(_) => exit_codes::CONFIG_ERROR,
            Self::Request(_) | Self::ApiResponse { .. } | Self::Json(_) => {
                exit_codes::NETWORK_ERROR
            }
        }
    }
}

/// 5xx except 504
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    (500..600).contains(&status) && status != 504
}

/// Which error field wins when a body carries several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrder {
    /// `message`, then `detail`, then `detail.message`
    MessageFirst,
    /// `detail` (string), then `message`, then `detail.message`
    DetailFirst,
}

/// Pull the error message out of a JSON error body
#[must_use]
pub fn message_from_body(body: &Value, order: MessageOrder) -> Option<String> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let message = non_empty(body.get("message"));
    let detail = non_empty(body.get("detail"));
    let nested = non_empty(body.get("detail").and_then(|d| d.get("message")));

    match order {
        MessageOrder::MessageFirst => message.or(detail).or(nested),
        MessageOrder::DetailFirst => detail.or(message).or(nested),
    }
}

/// Message for a status whose body was not JSON
#[must_use]
pub fn status_fallback(status: u16, locale: Locale) -> String {
    match status {
        504 => t(locale, "errors.requestTimeout").to_string(),
        s if s >= 500 => t(locale, "errors.backendError").to_string(),
        404 => t(locale, "errors.notFound").to_string(),
        s => tf(locale, "errors.serverError", &[("status", &s.to_string())]),
    }
}

/// Turn a failed response into a user-facing message.
///
/// A JSON body yields its own message, or `fallback`, or the bare status.
/// Anything else maps through [`status_fallback`].
#[must_use]
pub fn describe_failure(
    status: u16,
    body: &str,
    order: MessageOrder,
    fallback: Option<&str>,
    locale: Locale,
) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => message_from_body(&json, order).unwrap_or_else(|| match fallback {
            Some(f) => f.to_string(),
            None => tf(locale, "errors.statusFallback", &[("status", &status.to_string())]),
        }),
        Err(_) => status_fallback(status, locale),
    }
}
