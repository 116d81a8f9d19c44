//! Health probe

use crate::client::SunpathClient;
use reqwest::Method;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: SunpathClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    /// Whether the backend answers `/health` with a 2xx.
    ///
    /// Uses the short health retry policy; every failure reads as `false`.
    pub async fn check(&self) -> bool {
        self.check_timed().await.0
    }

    /// Health with the time the probe took
    pub async fn check_timed(&self) -> (bool, Duration) {
        let start = Instant::now();
        let url = self.client.url("health");
        let policy = self.client.config().health_retry.clone();

        let healthy = match self
            .client
            .send(Method::GET, &url, Option::<&()>::None, Option::<&()>::None, &policy)
            .await
        {
            Ok(response) => {
                debug!(status = response.status().as_u16(), "Health probe answered");
                response.status().is_success()
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                false
            }
        };

        (healthy, start.elapsed())
    }
}
