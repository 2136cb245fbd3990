//! Timeline Assembly
//!
//! Builds the exported clip/marker document from a selected event
//! subset: one clip per distinct source file, one time-coded marker per
//! event, aggregated into a single video track.

mod assembler;
mod models;

pub use assembler::*;
pub use models::*;
