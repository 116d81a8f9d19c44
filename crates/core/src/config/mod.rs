//! Configuration loading and schema definitions
//!
//! Settings come from a TOML file (optional) and are then overridden by
//! `SUNPATH_*` environment variables.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
