//! Event Loader
//!
//! Reads the configured tabular sources, normalizes rows into
//! [`DetectionEvent`] values and applies the load-time filters, in this
//! order per row: time window first, then confidence.
//!
//! Loading uses partial-success semantics: a source that does not exist
//! is silently skipped, a source that exists but cannot be parsed is
//! reported in [`LoadReport::failures`] while the remaining sources are
//! still attempted.
//!
//! A row missing its label or confidence value is dropped with a
//! warning; it never becomes a retained event.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{
    DetectionEvent, EventKind, EventSet, FaceMatchRow, ObjectLabelRow, RawRecord, TextDetectionRow,
};
use crate::config::PipelineConfig;
use crate::{CoreError, CoreResult};

/// Conventional source file names within a data directory
pub const OBJECT_LABELS_FILE: &str = "labels.csv";
pub const FACE_MATCHES_FILE: &str = "faces.csv";
pub const TEXT_DETECTIONS_FILE: &str = "text.csv";

// =============================================================================
// Event Sources
// =============================================================================

/// Locations of the three independently optional event sources
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSources {
    object_labels: Option<PathBuf>,
    face_matches: Option<PathBuf>,
    text_detections: Option<PathBuf>,
}

impl EventSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points every source at its conventional file name inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        Self::new()
            .with_object_labels(dir.join(OBJECT_LABELS_FILE))
            .with_face_matches(dir.join(FACE_MATCHES_FILE))
            .with_text_detections(dir.join(TEXT_DETECTIONS_FILE))
    }

    pub fn with_object_labels(mut self, path: impl Into<PathBuf>) -> Self {
        self.object_labels = Some(path.into());
        self
    }

    pub fn with_face_matches(mut self, path: impl Into<PathBuf>) -> Self {
        self.face_matches = Some(path.into());
        self
    }

    pub fn with_text_detections(mut self, path: impl Into<PathBuf>) -> Self {
        self.text_detections = Some(path.into());
        self
    }

    /// Configured sources in fixed declaration order; this order is
    /// what makes the loaded event order deterministic
    fn entries(&self) -> Vec<(EventKind, &Path)> {
        let mut entries = Vec::new();
        if let Some(path) = &self.object_labels {
            entries.push((EventKind::ObjectLabel, path.as_path()));
        }
        if let Some(path) = &self.face_matches {
            entries.push((EventKind::FaceMatch, path.as_path()));
        }
        if let Some(path) = &self.text_detections {
            entries.push((EventKind::TextDetection, path.as_path()));
        }
        entries
    }
}

// =============================================================================
// Load Report
// =============================================================================

/// A source that existed but could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub kind: EventKind,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a load pass over all configured sources
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Events that survived the filters, in source iteration order
    pub events: EventSet,
    /// Sources that existed but failed to parse
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Returns the events, or the first failure if any source failed
    pub fn into_result(self) -> CoreResult<EventSet> {
        match self.failures.into_iter().next() {
            None => Ok(self.events),
            Some(failure) => Err(CoreError::LoadFailed {
                path: failure.path,
                reason: failure.reason,
            }),
        }
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Loads all configured sources into a single ordered event set.
///
/// Missing sources are skipped silently; unparseable sources contribute
/// a [`LoadFailure`] and do not abort the remaining sources.
pub fn load_events(sources: &EventSources, config: &PipelineConfig) -> LoadReport {
    let mut report = LoadReport::default();

    for (kind, path) in sources.entries() {
        if !path.exists() {
            debug!("Event source {:?} ({}) not present, skipping", path, kind.as_str());
            continue;
        }

        match load_source(kind, path, config) {
            Ok(events) => {
                debug!(
                    "Loaded {} {} events from {:?}",
                    events.len(),
                    kind.as_str(),
                    path
                );
                report.events.extend(events);
            }
            Err(e) => {
                warn!("Failed to load {} source {:?}: {}", kind.as_str(), path, e);
                report.failures.push(LoadFailure {
                    kind,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Loads one source file; a malformed row aborts this source only
fn load_source(
    kind: EventKind,
    path: &Path,
    config: &PipelineConfig,
) -> CoreResult<Vec<DetectionEvent>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| CoreError::LoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut events = Vec::new();
    match kind {
        EventKind::ObjectLabel => {
            for (index, row) in reader.deserialize::<ObjectLabelRow>().enumerate() {
                let row = parse_row(row, path, index)?;
                push_normalized(RawRecord::ObjectLabel(row), index, path, config, &mut events);
            }
        }
        EventKind::FaceMatch => {
            for (index, row) in reader.deserialize::<FaceMatchRow>().enumerate() {
                let row = parse_row(row, path, index)?;
                push_normalized(RawRecord::FaceMatch(row), index, path, config, &mut events);
            }
        }
        EventKind::TextDetection => {
            for (index, row) in reader.deserialize::<TextDetectionRow>().enumerate() {
                let row = parse_row(row, path, index)?;
                push_normalized(RawRecord::TextDetection(row), index, path, config, &mut events);
            }
        }
    }

    Ok(events)
}

fn parse_row<T>(row: Result<T, csv::Error>, path: &Path, index: usize) -> CoreResult<T> {
    row.map_err(|e| CoreError::LoadFailed {
        path: path.to_path_buf(),
        reason: format!("record {}: {}", index + 1, e),
    })
}

/// Applies the per-row filters and pushes the surviving normalized event
fn push_normalized(
    record: RawRecord,
    index: usize,
    path: &Path,
    config: &PipelineConfig,
    events: &mut Vec<DetectionEvent>,
) {
    let start_time = record.timestamp_sec();
    if start_time > config.max_window_sec {
        return;
    }

    let Some(confidence) = record.confidence() else {
        warn!(
            "Record {} in {:?} has no confidence value, dropping",
            index + 1,
            path
        );
        return;
    };
    if confidence < config.min_confidence {
        return;
    }

    let file_name = record.file_name();
    let kind = record.kind();
    let Some(label) = record.take_label() else {
        warn!(
            "Record {} in {:?} has no {} label, dropping",
            index + 1,
            path,
            kind.as_str()
        );
        return;
    };

    events.push(DetectionEvent {
        file_name,
        kind,
        label,
        start_time,
        duration: config.marker_duration_sec,
        confidence,
    });
}
