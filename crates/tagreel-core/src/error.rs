//! tagreel Error Definitions
//!
//! Defines error types used throughout the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Load Errors
    // =========================================================================
    #[error("Failed to load event source {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    // =========================================================================
    // Query Errors
    // =========================================================================
    #[error("Query requires at least one criterion")]
    EmptyQuery,

    // =========================================================================
    // Timeline Errors
    // =========================================================================
    #[error("Cannot build a timeline from an empty selection")]
    EmptySelection,

    // =========================================================================
    // Export Errors
    // =========================================================================
    #[error("Failed to export timeline to {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
