//! Client for the SunPath calculation backend
//!
//! All solar position, irradiance and shadow math happens on the backend;
//! this crate gets requests there and answers back reliably.
//!
//! # Features
//!
//! - **Configuration**: built from the workspace TOML config or the environment
//! - **Retry with exponential backoff**: transport failures and 5xx (except 504)
//! - **Readable failures**: backend error bodies mapped to localized messages
//! - **Request correlation**: every attempt carries an `X-Request-ID`
//! - **Address search**: Nominatim forward and reverse geocoding
//!
//! # Example
//!
//! ```rust,no_run
//! use sunpath_api_client::SunpathClient;
//! use sunpath_core::model::SolarCalculationRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SunpathClient::new()?;
//!
//!     if !client.health().check().await {
//!         eprintln!("backend is down");
//!     }
//!
//!     let request = SolarCalculationRequest::for_day(37.5665, 126.978, "2025-06-21", 10.0);
//!     let response = client.integrated().calculate(&request).await?;
//!     println!("max altitude {:.1}°", response.summary.max_altitude);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::SunpathClient;
pub use config::{resolve_base_url, ClientConfig};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::SunpathClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{
        CacheApi, GeocodeResult, GeocodingApi, HealthApi, IntegratedApi, ShadowApi, SolarApi,
    };
    pub use crate::error::{ApiError, ApiResult};
}
