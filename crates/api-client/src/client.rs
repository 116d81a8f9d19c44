//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{CacheApi, GeocodingApi, HealthApi, IntegratedApi, ShadowApi, SolarApi};
use crate::error::{is_retryable_status, ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use sunpath_core::retry::{retry_async, RetryConfig, RetryDecision};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// SunPath backend client with retry built in
///
/// This client wraps `reqwest` and adds:
/// - Retry with exponential backoff for transport failures and 5xx (not 504)
/// - A per-attempt timeout that is never retried
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct SunpathClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl SunpathClient {
    /// Create a new client from the workspace configuration
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config(format!("invalid user agent: {}", config.user_agent)))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Calculate, optimize and batch endpoints
    #[must_use]
    pub fn integrated(&self) -> IntegratedApi {
        IntegratedApi::new(self.clone())
    }

    /// Sunrise/sunset endpoint
    #[must_use]
    pub fn solar(&self) -> SolarApi {
        SolarApi::new(self.clone())
    }

    /// Single-instant shadow endpoint
    #[must_use]
    pub fn shadow(&self) -> ShadowApi {
        ShadowApi::new(self.clone())
    }

    /// Backend cache statistics
    #[must_use]
    pub fn cache(&self) -> CacheApi {
        CacheApi::new(self.clone())
    }

    /// Health probe
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    /// Address search
    #[must_use]
    pub fn geocoding(&self) -> GeocodingApi {
        GeocodingApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with retry
    // -------------------------------------------------------------------------

    /// Absolute URL for a backend path
    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a backend path with the regular retry policy
    pub(crate) async fn get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ApiResult<Response> {
        let url = self.url(path);
        self.send(Method::GET, &url, Some(query), Option::<&()>::None, &self.config.retry)
            .await
    }

    /// POST a JSON body to a backend path with the regular retry policy
    pub(crate) async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Response> {
        let url = self.url(path);
        self.send(Method::POST, &url, Option::<&()>::None, Some(body), &self.config.retry)
            .await
    }

    /// Send a request under `policy`.
    ///
    /// 2xx, 4xx and 504 responses come back on the first attempt. Other 5xx
    /// responses and transport failures are retried; when attempts run out
    /// the last response (or transport error) is returned.
    #[instrument(skip(self, query, body, policy))]
    pub(crate) async fn send<Q, B>(
        &self,
        method: Method,
        url: &str,
        query: Option<&Q>,
        body: Option<&B>,
        policy: &RetryConfig,
    ) -> ApiResult<Response>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let start = Instant::now();
        let max_attempts = policy.max_attempts;

        let result = retry_async(policy, classify, |attempt| {
            let method = method.clone();
            async move {
                let request_id = Uuid::new_v4().to_string();
                debug!(
                    request_id = %request_id,
                    url = %url,
                    attempt = attempt + 1,
                    max_attempts,
                    "Sending request"
                );
                let outcome = self.send_once(&request_id, method, url, query, body).await;
                match &outcome {
                    Ok(response) if is_retryable_status(response.status().as_u16()) => {
                        warn!(
                            request_id = %request_id,
                            status = response.status().as_u16(),
                            attempt = attempt + 1,
                            "Backend error"
                        );
                    }
                    Err(e) => {
                        warn!(request_id = %request_id, error = %e, attempt = attempt + 1, "Request failed");
                    }
                    Ok(_) => {}
                }
                outcome
            }
        })
        .await;

        debug!(
            url = %url,
            attempts = result.attempts,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request finished"
        );
        result.value
    }

    /// Execute a single request without retry
    async fn send_once<Q, B>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ApiResult<Response>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        if let Some(q) = query {
            request = request.query(q);
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        request.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Request(e)
        }
    }

    /// Decode a successful body, or map a failed one with `on_error`.
    ///
    /// The client timeout also covers the body, so a stalled body is a
    /// timeout like a stalled connect.
    pub(crate) async fn read_json<T, F>(&self, response: Response, on_error: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(u16, &str) -> String,
    {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = on_error(status.as_u16(), &body);
        debug!(status = status.as_u16(), message = %message, "Backend returned an error");
        Err(ApiError::api_response(status.as_u16(), message))
    }
}

/// Retry policy shared by every backend call
fn classify(outcome: &ApiResult<Response>) -> RetryDecision {
    match outcome {
        Ok(response) if is_retryable_status(response.status().as_u16()) => RetryDecision::Retry,
        Ok(_) => RetryDecision::Done,
        Err(e) if e.is_retryable() => RetryDecision::Retry,
        Err(_) => RetryDecision::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SunpathClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_joining() {
        let client = SunpathClient::with_config(ClientConfig::for_url("http://localhost:8000/")).unwrap();
        assert_eq!(
            client.url("/api/integrated/calculate"),
            "http://localhost:8000/api/integrated/calculate"
        );
        assert_eq!(client.url("health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = ClientConfig::default().with_timeout(std::time::Duration::ZERO);
        assert!(SunpathClient::with_config(config).is_err());
    }
}
