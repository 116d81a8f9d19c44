//! Proxy settings and shared handler state

use crate::error::ProxyError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use sunpath_core::config::Config;
use sunpath_core::i18n::Locale;

/// Everything needed to run the proxy
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub bind: SocketAddr,
    pub backend_url: String,
    /// Mount point, e.g. `/api/proxy`
    pub prefix: String,
    pub timeout: Duration,
    /// Language of the error messages
    pub locale: Locale,
}

impl ProxySettings {
    /// Take `[proxy]` from the configuration and the stored app locale
    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        let proxy = &config.schema.proxy;
        let bind = proxy
            .bind
            .parse()
            .map_err(|e| ProxyError::Settings(format!("proxy.bind '{}': {e}", proxy.bind)))?;
        Ok(Self {
            bind,
            backend_url: proxy.backend_url.clone(),
            prefix: proxy.prefix.clone(),
            timeout: Duration::from_secs(proxy.timeout_secs),
            locale: Locale::resolve(None, config.schema.app.locale.as_deref()),
        })
    }

    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        let defaults = Config::defaults();
        let proxy = &defaults.schema.proxy;
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            backend_url: proxy.backend_url.clone(),
            prefix: proxy.prefix.clone(),
            timeout: Duration::from_secs(proxy.timeout_secs),
            locale: Locale::default(),
        }
    }
}

struct Inner {
    http: reqwest::Client,
    backend_url: String,
    prefix: String,
    timeout: Duration,
    locale: Locale,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ProxyState {
    inner: Arc<Inner>,
}

impl ProxyState {
    pub fn new(settings: ProxySettings) -> Result<Self, ProxyError> {
        if !settings.backend_url.starts_with("http://") && !settings.backend_url.starts_with("https://") {
            return Err(ProxyError::Settings(format!(
                "backend URL must start with http:// or https://: {}",
                settings.backend_url
            )));
        }
        if !settings.prefix.starts_with('/') || settings.prefix.ends_with('/') {
            return Err(ProxyError::Settings(format!(
                "prefix must start with '/' and not end with '/': {}",
                settings.prefix
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ProxyError::Settings(format!("HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                backend_url: settings.backend_url.trim_end_matches('/').to_string(),
                prefix: settings.prefix,
                timeout: settings.timeout,
                locale: settings.locale,
            }),
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.inner.backend_url
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.inner.locale
    }

    /// `{backend}/{path}` plus the original query string
    #[must_use]
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query.filter(|q| !q.is_empty()) {
            Some(q) => format!("{}/{path}?{q}", self.inner.backend_url),
            None => format!("{}/{path}", self.inner.backend_url),
        }
    }
}
