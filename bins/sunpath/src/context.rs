//! Per-invocation state shared by every command

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use sunpath_api_client::{ClientConfig, SunpathClient};
use sunpath_core::config::Config;
use sunpath_core::i18n::Locale;
use sunpath_core::presets::PresetStore;
use sunpath_simulation::{TimeOfDay, Timeline};
use thiserror::Error;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A failure that has already been reported to the user
#[derive(Debug, Error)]
#[error("exit status {0}")]
pub struct Silent(pub i32);

pub struct Context {
    pub config: Config,
    pub locale: Locale,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Context {
    pub fn load(
        config_path: Option<&Path>,
        locale: Option<&str>,
        format: OutputFormat,
        verbose: bool,
    ) -> Result<Self> {
        let path = config_path.map(|p| p.to_string_lossy().into_owned());
        let config = Config::load(path.as_deref())?;
        let locale = Locale::resolve(locale, config.schema.app.locale.as_deref());
        Ok(Self {
            config,
            locale,
            format,
            verbose,
        })
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Spinners are hidden for JSON output so stdout stays parseable
    pub fn quiet(&self) -> bool {
        self.is_json()
    }

    pub fn client(&self) -> Result<SunpathClient> {
        let config = ClientConfig::from_config(&self.config).with_locale(self.locale);
        Ok(SunpathClient::with_config(config)?)
    }

    pub fn presets(&self) -> Result<PresetStore> {
        let path = self
            .config
            .schema
            .app
            .presets_path
            .as_ref()
            .map_or_else(PresetStore::default_path, PathBuf::from);
        Ok(PresetStore::open(path)?)
    }

    pub fn object_height(&self, explicit: Option<f64>) -> f64 {
        explicit.unwrap_or(self.config.schema.app.object_height)
    }

    /// Playback window from `[app]`
    pub fn timeline(&self) -> Timeline {
        let app = &self.config.schema.app;
        let start = TimeOfDay::parse_lenient(&app.timeline_start);
        let end = TimeOfDay::parse_lenient(&app.timeline_end);
        Timeline::new(start, end)
    }
}

/// Pretty-print any serializable value on stdout
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
