//! Backend cache statistics

use crate::client::SunpathClient;
use serde_json::Value;
use tracing::warn;

/// Cache statistics API interface
#[derive(Clone)]
pub struct CacheApi {
    client: SunpathClient,
}

impl CacheApi {
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    /// Cache counters as the backend reports them; `None` when unavailable
    pub async fn stats(&self) -> Option<Value> {
        let result = match self.client.get("api/cache/stats", &[] as &[(&str, &str)]).await {
            Ok(response) => {
                self.client.read_json::<Value, _>(response, |_, _| {
                    "Failed to fetch cache stats".to_string()
                })
                .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "Cache stats unavailable");
                None
            }
        }
    }
}
