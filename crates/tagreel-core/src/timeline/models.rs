//! Timeline Model Definitions
//!
//! Defines the timeline document handed to the export adapter: one
//! track containing one clip per source file, each clip carrying the
//! time-coded markers for its events.

use serde::{Deserialize, Serialize};

use crate::{Ratio, TimeRange};

// =============================================================================
// Marker
// =============================================================================

/// Marker color palette of the interchange format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkerColor {
    Blue,
    Green,
    Magenta,
    Red,
}

impl MarkerColor {
    /// Maps a category wire name to its marker color.
    ///
    /// Face matches are blue, object labels green, text detections
    /// magenta; anything unrecognized falls back to red. The closed
    /// event enumeration makes the fallback unreachable in normal
    /// operation, but metadata read back from an exported document is
    /// just a string.
    pub fn for_kind_name(name: &str) -> Self {
        match name {
            "Face" => MarkerColor::Blue,
            "Label" => MarkerColor::Green,
            "Text" => MarkerColor::Magenta,
            _ => MarkerColor::Red,
        }
    }
}

/// Marker metadata carried through the interchange document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerMetadata {
    /// Category wire name ("Label", "Face", "Text")
    pub label_type: String,
    /// Detection confidence (0 - 100)
    pub confidence: f64,
}

/// A sub-interval annotation on a clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Marker name (the event label)
    pub name: String,
    /// Range relative to the clip start
    pub marked_range: TimeRange,
    pub color: MarkerColor,
    pub metadata: MarkerMetadata,
}

impl Marker {
    pub fn new(name: &str, marked_range: TimeRange, color: MarkerColor, metadata: MarkerMetadata) -> Self {
        Self {
            name: name.to_string(),
            marked_range,
            color,
            metadata,
        }
    }
}

// =============================================================================
// Clip
// =============================================================================

/// Reference to the source media file of a clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    /// Source media file name
    pub target_url: String,
    /// Available time window of the source
    pub available_range: TimeRange,
}

impl MediaReference {
    pub fn new(target_url: &str, available_range: TimeRange) -> Self {
        Self {
            target_url: target_url.to_string(),
            available_range,
        }
    }
}

/// A timeline element referencing one media file over a fixed window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub name: String,
    pub media_reference: MediaReference,
    /// Window of the source shown by this clip
    pub source_range: TimeRange,
    /// Markers in event order
    pub markers: Vec<Marker>,
}

impl Clip {
    pub fn new(name: &str, media_reference: MediaReference, source_range: TimeRange) -> Self {
        Self {
            name: name.to_string(),
            media_reference,
            source_range,
            markers: vec![],
        }
    }

    /// Appends a marker to the clip
    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

// =============================================================================
// Track
// =============================================================================

/// Track type/kind enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// An ordered sequence of clips
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(name: &str, kind: TrackKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            clips: vec![],
        }
    }

    /// Creates a new video track
    pub fn new_video(name: &str) -> Self {
        Self::new(name, TrackKind::Video)
    }

    /// Appends a clip to the track
    pub fn add_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }
}

// =============================================================================
// Timeline Document
// =============================================================================

/// The complete exported structure: one track, its clips, their markers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    pub name: String,
    /// Frame rate the clip windows are meant to play at
    pub frame_rate: Ratio,
    pub tracks: Vec<Track>,
}

impl TimelineDocument {
    pub fn new(name: &str, frame_rate: Ratio) -> Self {
        Self {
            name: name.to_string(),
            frame_rate,
            tracks: vec![],
        }
    }

    /// Appends a track to the timeline
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Total number of clips across all tracks
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Total number of markers across all clips
    pub fn marker_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .map(|c| c.markers.len())
            .sum()
    }
}
