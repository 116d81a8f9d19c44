//! Proxy failures and their JSON bodies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::time::Duration;
use sunpath_core::i18n::{t, tf, Locale};
use thiserror::Error;

/// Everything that can go wrong between the browser and the backend
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Upstream did not answer within the proxy timeout
    #[error("Request timeout")]
    Timeout(Duration),

    /// Upstream could not be reached
    #[error("Network error")]
    Network(String),

    /// Upstream answered but the body could not be read
    #[error("Response read error")]
    ReadBody(String),

    /// Upstream itself timed out
    #[error("Gateway timeout")]
    GatewayTimeout,

    /// Upstream returned another 5xx
    #[error("Backend server error")]
    Backend { status: StatusCode, detail: String },

    /// Anything else while building or sending the request
    #[error("Proxy request failed")]
    Unexpected(String),

    /// Startup: bad settings
    #[error("Invalid proxy settings: {0}")]
    Settings(String),

    /// Startup: listener could not be bound or served
    #[error("Proxy server error: {0}")]
    Bind(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] sunpath_core::Error),
}

/// Body of every error the proxy produces itself
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) | Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ReadBody(_) => StatusCode::BAD_GATEWAY,
            Self::Backend { status, .. } => *status,
            Self::Unexpected(_) | Self::Settings(_) | Self::Bind(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body with messages in `locale`
    #[must_use]
    pub fn body(&self, locale: Locale) -> ErrorBody {
        let (message, detail) = match self {
            Self::Timeout(limit) => (
                t(locale, "proxy.timeout").to_string(),
                Some(tf(
                    locale,
                    "proxy.timeoutDetail",
                    &[("secs", &limit.as_secs_f64().to_string())],
                )),
            ),
            Self::Network(detail) => (t(locale, "proxy.network").to_string(), Some(detail.clone())),
            Self::ReadBody(_) => (t(locale, "proxy.readError").to_string(), None),
            Self::GatewayTimeout => (
                t(locale, "proxy.gatewayTimeout").to_string(),
                Some(t(locale, "proxy.gatewayTimeoutDetail").to_string()),
            ),
            Self::Backend { detail, .. } => {
                (t(locale, "proxy.backendError").to_string(), Some(detail.clone()))
            }
            other => (t(locale, "proxy.unexpected").to_string(), Some(other.detail())),
        };

        ErrorBody {
            error: self.label(),
            message,
            detail,
        }
    }

    /// Short machine-readable label (`error` field)
    fn label(&self) -> String {
        match self {
            Self::Settings(_) | Self::Bind(_) | Self::Config(_) => "Proxy request failed".to_string(),
            other => other.to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Unexpected(detail) | Self::Settings(detail) => detail.clone(),
            Self::Bind(e) => e.to_string(),
            Self::Config(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Render as an HTTP response in `locale`
    #[must_use]
    pub fn into_response_in(self, locale: Locale) -> Response {
        (self.status(), Json(self.body(locale))).into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.into_response_in(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(ProxyError::Timeout(Duration::from_secs(60)).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ProxyError::Network("refused".into()).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ProxyError::ReadBody("eof".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ProxyError::GatewayTimeout.status(), StatusCode::GATEWAY_TIMEOUT);
        let backend = ProxyError::Backend {
            status: StatusCode::BAD_GATEWAY,
            detail: "upstream".into(),
        };
        assert_eq!(backend.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_body() {
        let body = ProxyError::Timeout(Duration::from_secs(60)).body(Locale::En);
        assert_eq!(body.error, "Request timeout");
        assert_eq!(
            body.detail.as_deref(),
            Some("The request did not complete within 60 seconds.")
        );

        let body = ProxyError::Timeout(Duration::from_secs(60)).body(Locale::Ko);
        assert_eq!(body.detail.as_deref(), Some("요청이 60초 내에 완료되지 않았습니다."));
    }

    #[test]
    fn test_read_error_has_no_detail() {
        let body = ProxyError::ReadBody("connection reset".into()).body(Locale::En);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Response read error");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_unexpected_body() {
        let body = ProxyError::Unexpected("bad url".into()).body(Locale::En);
        assert_eq!(body.error, "Proxy request failed");
        assert_eq!(body.detail.as_deref(), Some("bad url"));
    }
}
