//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Calculation backend
    #[serde(default)]
    pub api: ApiConfig,

    /// Local proxy server
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Client behavior
    #[serde(default)]
    pub app: AppConfig,

    /// Geocoding provider
    #[serde(default)]
    pub geocoding: GeocodingConfig,
}

/// Calculation backend client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Per-attempt timeout; slightly longer than the proxy's own limit
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_api_timeout(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u64 {
    65
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    1000
}

/// Passthrough proxy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Backend the proxy forwards to
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Path prefix the proxy is mounted under
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Upstream timeout
    #[serde(default = "default_proxy_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            backend_url: default_backend_url(),
            prefix: default_prefix(),
            timeout_secs: default_proxy_timeout(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_prefix() -> String {
    "/api/proxy".to_string()
}

fn default_proxy_timeout() -> u64 {
    60
}

/// Application behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Stored UI locale (`ko` or `en`)
    #[serde(default)]
    pub locale: Option<String>,

    /// Preset file; defaults to the platform data directory
    #[serde(default)]
    pub presets_path: Option<String>,

    /// Object height used when none is given
    #[serde(default = "default_object_height")]
    pub object_height: f64,

    /// Animation window start (`HH:MM`)
    #[serde(default = "default_timeline_start")]
    pub timeline_start: String,

    /// Animation window end (`HH:MM`)
    #[serde(default = "default_timeline_end")]
    pub timeline_end: String,

    /// Log level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: None,
            presets_path: None,
            object_height: default_object_height(),
            timeline_start: default_timeline_start(),
            timeline_end: default_timeline_end(),
            log_level: default_log_level(),
        }
    }
}

fn default_object_height() -> f64 {
    10.0
}

fn default_timeline_start() -> String {
    "05:00".to_string()
}

fn default_timeline_end() -> String {
    "20:00".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Address search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim-compatible service
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,

    /// Restrict searches to these ISO country codes (comma separated, empty for none)
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// `accept-language` sent with each query
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Maximum search results
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
            country_codes: default_country_codes(),
            accept_language: default_accept_language(),
            limit: default_limit(),
        }
    }
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_country_codes() -> String {
    "kr".to_string()
}

fn default_accept_language() -> String {
    "ko,en".to_string()
}

fn default_limit() -> u32 {
    5
}
