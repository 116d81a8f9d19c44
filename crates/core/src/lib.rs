//! Core building blocks for the SunPath & Shadow Simulator tools
//!
//! This crate holds everything the other crates share:
//!
//! - **Model**: serde types for the calculation backend's JSON contract
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Retry**: exponential backoff policies and an async retry driver
//! - **Configuration**: TOML configuration with environment overrides
//! - **Presets**: file-backed storage of saved location/date scenarios
//! - **i18n**: Korean and English message dictionaries
//!
//! # Example
//!
//! ```rust,no_run
//! use sunpath_core::model::SolarCalculationRequest;
//! use sunpath_core::presets::PresetStore;
//!
//! let request = SolarCalculationRequest::for_day(37.5665, 126.978, "2025-06-21", 10.0);
//! request.validate().expect("valid request");
//!
//! let mut store = PresetStore::open_default().expect("preset store");
//! store.save("Seoul solstice", request.location.coordinates(), "2025-06-21", 10.0)
//!     .expect("saved");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod presets;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::i18n::{Locale, t};
    pub use crate::model::{
        Coordinates, SolarCalculationRequest, SolarCalculationResponse, SolarDataPoint,
    };
    pub use crate::presets::{Preset, PresetStore};
    pub use crate::retry::{retry_async, RetryConfig, RetryDecision};
}
