//! Client-side work on calculated solar series
//!
//! The backend returns one sample per interval. Everything here runs on
//! those samples without another round trip:
//!
//! - **interpolate**: the sun and shadow at any instant between samples
//! - **geometry**: angle blending and shadow endpoints on the ground
//! - **timeline**: minute-by-minute playback driven by a tokio task
//! - **export**: CSV, JSON and plain-text summaries
//! - **report**: a printable PDF report
//! - **insights**: series peaks and the four-season comparison

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod geometry;
pub mod insights;
pub mod interpolate;
pub mod report;
pub mod timeline;

pub use export::ExportFormat;
pub use interpolate::{interpolate_at, parse_timestamp, target_instant};
pub use timeline::{Animator, AnimatorHandle, PlaySpeed, TimeOfDay, Timeline};
