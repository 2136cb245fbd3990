//! tagreel Core Engine
//!
//! Transforms per-frame detection events (object labels, face matches,
//! text detections) produced by a media-analysis pipeline into a
//! normalized editorial timeline document.
//!
//! The pipeline has four stages:
//!
//! 1. [`events::load_events`] — read the configured tabular sources and
//!    normalize surviving rows into a [`events::EventSet`].
//! 2. [`query::query`] — multi-criteria intersection query over the
//!    normalized events.
//! 3. [`timeline::build_timeline`] — group a selected subset by source
//!    file and assemble the clip/marker document.
//! 4. [`export::TimelineWriter`] — hand the document to an interchange
//!    serializer.
//!
//! All stages are synchronous, in-memory transformations; only the load
//! and export boundaries touch the filesystem.

pub mod config;
pub mod events;
pub mod export;
pub mod query;
pub mod timeline;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_pipeline;
