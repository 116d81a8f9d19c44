//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a set of backend endpoints.
//!
//! | Module | Backend route | Description |
//! |--------|---------------|-------------|
//! | `integrated` | `/api/integrated/{calculate,optimize,batch}` | Full-day series, optimal periods, scenario batches |
//! | `solar` | `/api/solar/sunrise-sunset` | Sunrise and sunset for a day |
//! | `shadow` | `/api/shadow/calculate` | Shadow at one instant |
//! | `cache` | `/api/cache/stats` | Backend cache counters |
//! | `health` | `/health` | Keep-alive probe |
//! | `geocoding` | Nominatim `/search`, `/reverse` | Address search |

pub mod cache;
pub mod geocoding;
pub mod health;
pub mod integrated;
pub mod shadow;
pub mod solar;

pub use cache::CacheApi;
pub use geocoding::{GeocodeResult, GeocodingApi};
pub use health::HealthApi;
pub use integrated::IntegratedApi;
pub use shadow::ShadowApi;
pub use solar::SolarApi;
