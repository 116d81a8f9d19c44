//! Configuration for the SunPath API client
//!
//! Built from the workspace configuration file with sensible defaults.

use crate::error::{ApiError, ApiResult};
use std::time::Duration;
use sunpath_core::config::{Config, GeocodingConfig};
use sunpath_core::i18n::Locale;
use sunpath_core::retry::RetryConfig;

/// Default backend when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path the proxy is mounted under on an HTTPS origin
pub const PROXY_PATH: &str = "/api/proxy";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (or the proxy path on an HTTPS origin)
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry policy for calculation calls
    pub retry: RetryConfig,
    /// Retry policy for keep-alive health probes
    pub health_retry: RetryConfig,
    /// Language for fallback error messages
    pub locale: Locale,
    /// `User-Agent` header; Nominatim rejects anonymous clients
    pub user_agent: String,
    /// Address search settings
    pub geocoding: GeocodingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(65),
            retry: RetryConfig::default(),
            health_retry: RetryConfig::health(),
            locale: Locale::default(),
            user_agent: format!("sunpath/{}", env!("CARGO_PKG_VERSION")),
            geocoding: GeocodingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load the workspace configuration (file plus `SUNPATH_*` overrides)
    pub fn from_env() -> ApiResult<Self> {
        let config = Config::load(None)?;
        Ok(Self::from_config(&config))
    }

    /// Build from an already loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let api = &config.schema.api;
        Self {
            base_url: api.base_url.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
            retry: RetryConfig::with_retries(
                api.max_retries,
                Duration::from_millis(api.initial_delay_ms),
            ),
            locale: Locale::resolve(None, config.schema.app.locale.as_deref()),
            geocoding: config.schema.geocoding.clone(),
            ..Self::default()
        }
    }

    /// Configuration for a given backend URL, defaults otherwise
    #[must_use]
    pub fn for_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy for calculation calls
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the retry policy for health probes
    #[must_use]
    pub fn with_health_retry(mut self, retry: RetryConfig) -> Self {
        self.health_retry = retry;
        self
    }

    /// Set the message locale
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Point address search at another service
    #[must_use]
    pub fn with_geocoding(mut self, geocoding: GeocodingConfig) -> Self {
        self.geocoding = geocoding;
        self
    }

    /// Route through the proxy when the caller lives on an HTTPS origin
    #[must_use]
    pub fn for_origin(mut self, page_origin: Option<&str>) -> Self {
        self.base_url = resolve_base_url(&self.base_url, page_origin);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for url in [&self.base_url, &self.geocoding.base_url] {
            if url.is_empty() {
                return Err(ApiError::config("base_url cannot be empty"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::InvalidUrl(format!(
                    "URL must start with http:// or https://: {url}"
                )));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

/// Decide where requests go.
///
/// A page served over `https:` cannot call a plain `http:` backend, so such
/// callers go through the proxy mounted on their own origin.
#[must_use]
pub fn resolve_base_url(api_url: &str, page_origin: Option<&str>) -> String {
    match page_origin {
        Some(origin) if origin.starts_with("https://") && api_url.starts_with("http://") => {
            format!("{}{PROXY_PATH}", origin.trim_end_matches('/'))
        }
        _ => api_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(65));
        assert_eq!(config.retry.max_retries(), 3);
        assert_eq!(config.health_retry.max_retries(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_config_maps_retry() {
        let mut config = Config::defaults();
        config.schema.api.max_retries = 1;
        config.schema.api.initial_delay_ms = 250;
        config.schema.app.locale = Some("en".to_string());

        let client = ClientConfig::from_config(&config);
        assert_eq!(client.retry.max_attempts, 2);
        assert_eq!(client.retry.delay_for_attempt(1), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_url() {
        let config = ClientConfig::for_url("localhost:8000");
        assert!(matches!(config.validate(), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            resolve_base_url("http://10.0.0.5:8000", Some("https://sunpath.app")),
            "https://sunpath.app/api/proxy"
        );
        assert_eq!(
            resolve_base_url("https://api.sunpath.app", Some("https://sunpath.app")),
            "https://api.sunpath.app"
        );
        assert_eq!(
            resolve_base_url("http://10.0.0.5:8000", Some("http://localhost:3000")),
            "http://10.0.0.5:8000"
        );
        assert_eq!(resolve_base_url("http://10.0.0.5:8000", None), "http://10.0.0.5:8000");
    }
}
