//! Detection Event Models
//!
//! Defines the normalized event model shared by the whole pipeline and
//! the per-category raw row shapes the loader reads from disk. Each
//! source category has its own record shape; normalization into
//! [`DetectionEvent`] dispatches over the [`RawRecord`] tag instead of
//! probing fields at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TimeSec;

// =============================================================================
// Event Kind
// =============================================================================

/// Categories of detection events the pipeline ingests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// Object detection label in a frame
    ObjectLabel,
    /// Recognized face matched against a known identity
    FaceMatch,
    /// Text detection (OCR)
    TextDetection,
}

impl EventKind {
    /// Returns all event kinds in source declaration order
    pub fn all() -> Vec<EventKind> {
        vec![
            EventKind::ObjectLabel,
            EventKind::FaceMatch,
            EventKind::TextDetection,
        ]
    }

    /// Returns the category wire name used in source files and marker
    /// metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ObjectLabel => "Label",
            EventKind::FaceMatch => "Face",
            EventKind::TextDetection => "Text",
        }
    }
}

// =============================================================================
// Detection Event
// =============================================================================

/// A single normalized, time-stamped, confidence-scored annotation of
/// one media file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// Basename of the source media file (no path)
    pub file_name: String,
    /// Event category
    pub kind: EventKind,
    /// Category-specific label (object class / matched identity /
    /// recognized text)
    pub label: String,
    /// Seconds from the start of the source media
    pub start_time: TimeSec,
    /// Annotated instant length in seconds
    pub duration: TimeSec,
    /// Detection confidence (0 - 100)
    pub confidence: f64,
}

// =============================================================================
// Event Set
// =============================================================================

/// An ordered collection of detection events.
///
/// Insertion order is source iteration order; no stage of the pipeline
/// re-sorts it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSet(Vec<DetectionEvent>);

impl EventSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, event: DetectionEvent) {
        self.0.push(event);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionEvent> {
        self.0.iter()
    }

    /// Returns the events as a slice
    pub fn events(&self) -> &[DetectionEvent] {
        &self.0
    }
}

impl From<Vec<DetectionEvent>> for EventSet {
    fn from(events: Vec<DetectionEvent>) -> Self {
        Self(events)
    }
}

impl FromIterator<DetectionEvent> for EventSet {
    fn from_iter<I: IntoIterator<Item = DetectionEvent>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<DetectionEvent> for EventSet {
    fn extend<I: IntoIterator<Item = DetectionEvent>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for EventSet {
    type Item = DetectionEvent;
    type IntoIter = std::vec::IntoIter<DetectionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a DetectionEvent;
    type IntoIter = std::slice::Iter<'a, DetectionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Raw Source Rows
// =============================================================================

/// Raw object-label row as present in the source file
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectLabelRow {
    #[serde(rename = "Video")]
    pub video: String,
    #[serde(rename = "Timestamp(ms)")]
    pub timestamp_ms: f64,
    #[serde(rename = "Confidence")]
    pub confidence: Option<f64>,
    #[serde(rename = "Label")]
    pub label: Option<String>,
}

/// Raw face-match row as present in the source file
#[derive(Debug, Deserialize)]
pub(crate) struct FaceMatchRow {
    #[serde(rename = "Video")]
    pub video: String,
    #[serde(rename = "Timestamp(ms)")]
    pub timestamp_ms: f64,
    #[serde(rename = "Confidence")]
    pub confidence: Option<f64>,
    #[serde(rename = "MatchedName")]
    pub matched_name: Option<String>,
}

/// Raw text-detection row as present in the source file
#[derive(Debug, Deserialize)]
pub(crate) struct TextDetectionRow {
    #[serde(rename = "Video")]
    pub video: String,
    #[serde(rename = "Timestamp(ms)")]
    pub timestamp_ms: f64,
    #[serde(rename = "Confidence")]
    pub confidence: Option<f64>,
    #[serde(rename = "DetectedText")]
    pub detected_text: Option<String>,
}

/// A raw row tagged with its source category, before normalization
#[derive(Debug)]
pub(crate) enum RawRecord {
    ObjectLabel(ObjectLabelRow),
    FaceMatch(FaceMatchRow),
    TextDetection(TextDetectionRow),
}

impl RawRecord {
    pub fn kind(&self) -> EventKind {
        match self {
            RawRecord::ObjectLabel(_) => EventKind::ObjectLabel,
            RawRecord::FaceMatch(_) => EventKind::FaceMatch,
            RawRecord::TextDetection(_) => EventKind::TextDetection,
        }
    }

    /// Source timestamp converted from milliseconds to seconds
    pub fn timestamp_sec(&self) -> TimeSec {
        let ms = match self {
            RawRecord::ObjectLabel(row) => row.timestamp_ms,
            RawRecord::FaceMatch(row) => row.timestamp_ms,
            RawRecord::TextDetection(row) => row.timestamp_ms,
        };
        ms / 1000.0
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            RawRecord::ObjectLabel(row) => row.confidence,
            RawRecord::FaceMatch(row) => row.confidence,
            RawRecord::TextDetection(row) => row.confidence,
        }
    }

    /// Basename of the referenced video file
    pub fn file_name(&self) -> String {
        let video = match self {
            RawRecord::ObjectLabel(row) => &row.video,
            RawRecord::FaceMatch(row) => &row.video,
            RawRecord::TextDetection(row) => &row.video,
        };
        Path::new(video)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(video)
            .to_string()
    }

    /// Consumes the record and returns its category-specific label
    pub fn take_label(self) -> Option<String> {
        match self {
            RawRecord::ObjectLabel(row) => row.label,
            RawRecord::FaceMatch(row) => row.matched_name,
            RawRecord::TextDetection(row) => row.detected_text,
        }
    }
}
