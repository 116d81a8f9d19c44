//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use crate::model::parse_hhmm;
use std::net::SocketAddr;
use std::path::Path;
use tracing::debug;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path (or the standard locations),
    /// then apply `SUNPATH_*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        apply_env_overrides(&mut config.schema, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load without looking at the environment
    pub fn load_file(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            debug!(path = %p, "Loading configuration file");
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Defaults only (no file, no environment)
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Check URLs, timeouts, addresses and times
    pub fn validate(&self) -> Result<()> {
        let s = &self.schema;

        for (field, url) in [
            ("api.base_url", &s.api.base_url),
            ("proxy.backend_url", &s.proxy.backend_url),
            ("geocoding.base_url", &s.geocoding.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid_value(field, "must start with http:// or https://"));
            }
        }

        if s.api.timeout_secs == 0 {
            return Err(invalid_value("api.timeout_secs", "cannot be zero"));
        }
        if s.proxy.timeout_secs == 0 {
            return Err(invalid_value("proxy.timeout_secs", "cannot be zero"));
        }
        if !s.proxy.prefix.starts_with('/') || s.proxy.prefix.ends_with('/') {
            return Err(invalid_value(
                "proxy.prefix",
                "must start with '/' and not end with '/'",
            ));
        }
        if s.proxy.bind.parse::<SocketAddr>().is_err() {
            return Err(invalid_value("proxy.bind", "must be an address like 127.0.0.1:3000"));
        }
        if !(s.app.object_height > 0.0 && s.app.object_height <= 1000.0) {
            return Err(invalid_value("app.object_height", "must be in (0, 1000]"));
        }
        parse_hhmm("app.timeline_start", &s.app.timeline_start)?;
        parse_hhmm("app.timeline_end", &s.app.timeline_end)?;

        Ok(())
    }
}

fn invalid_value(field: &str, reason: &str) -> Error {
    Error::new(ErrorCode::InvalidConfigValue, format!("{field} {reason}"))
}

/// Apply environment overrides through `lookup`.
///
/// `SUNPATH_API_URL` sets both the client's and the proxy's backend, the
/// way a single deployment variable feeds both in production.
pub fn apply_env_overrides(schema: &mut ConfigSchema, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("SUNPATH_API_URL").filter(|v| !v.is_empty()) {
        schema.api.base_url.clone_from(&url);
        schema.proxy.backend_url = url;
    }
    if let Some(secs) = lookup("SUNPATH_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        schema.api.timeout_secs = secs;
    }
    if let Some(addr) = lookup("SUNPATH_PROXY_ADDR").filter(|v| !v.is_empty()) {
        schema.proxy.bind = addr;
    }
    if let Some(locale) = lookup("SUNPATH_LOCALE").filter(|v| !v.is_empty()) {
        schema.app.locale = Some(locale);
    }
    if let Some(path) = lookup("SUNPATH_PRESETS").filter(|v| !v.is_empty()) {
        schema.app.presets_path = Some(path);
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["sunpath.toml", ".sunpath.toml", ".config/sunpath.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    dirs::config_dir()
        .map(|d| d.join("sunpath").join("config.toml"))
        .filter(|p| p.exists())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {path}: {e}")).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {path}: {e}"),
        )
        .with_source(e)
    })
}
