//! Terminal helpers shared by SunPath binaries
//!
//! - Status lines and section banners
//! - Number formatting for solar quantities
//! - Spinners for backend calls

#![warn(missing_docs)]

pub mod output;
pub mod progress;
