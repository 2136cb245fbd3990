//! Event Ingestion
//!
//! Normalizes heterogeneous tagged detection sources (object labels,
//! face matches, text detections) into the uniform
//! [`DetectionEvent`] model and applies the load-time confidence and
//! time-window filters.

mod loader;
mod models;

pub use loader::*;
pub use models::*;
