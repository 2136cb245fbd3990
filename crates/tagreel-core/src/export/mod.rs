//! Export Adapter
//!
//! Boundary to the timeline-document serializer. The core only
//! guarantees the document it hands across [`TimelineWriter`] satisfies
//! the structural invariants; the destination's internal format belongs
//! to the adapter.
//!
//! The shipped [`JsonTimelineWriter`] serializes the document as pretty
//! JSON and writes atomically (temp file + rename), so a failed export
//! never leaves a partial file at the destination.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::timeline::TimelineDocument;
use crate::{CoreError, CoreResult};

/// Suggested default file name for exports
pub const DEFAULT_EXPORT_FILE_NAME: &str = "filtered_output.otio";

/// Default extension of the interchange format
pub const EXPORT_EXTENSION: &str = "otio";

/// Serializes a timeline document to a destination path
pub trait TimelineWriter {
    fn write_timeline(&self, document: &TimelineDocument, destination: &Path) -> CoreResult<()>;
}

/// Writer emitting the document as pretty-printed JSON
#[derive(Debug, Default)]
pub struct JsonTimelineWriter;

impl TimelineWriter for JsonTimelineWriter {
    fn write_timeline(&self, document: &TimelineDocument, destination: &Path) -> CoreResult<()> {
        let export_failed = |reason: String| CoreError::ExportFailed {
            path: destination.to_path_buf(),
            reason,
        };

        let content =
            serde_json::to_string_pretty(document).map_err(|e| export_failed(e.to_string()))?;

        let file_name = destination
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| export_failed("destination has no file name".to_string()))?;
        let temp_path = destination.with_file_name(format!("{}.tmp", file_name));

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, destination)
        };
        write().map_err(|e| export_failed(e.to_string()))?;

        info!(
            "Exported timeline with {} clips to {:?}",
            document.clip_count(),
            destination
        );
        Ok(())
    }
}
