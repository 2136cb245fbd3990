//! Timeline Assembler
//!
//! Groups a selected event subset by source file and builds one clip
//! per file, each carrying one marker per event. Within a clip, marker
//! offsets are relative to the group's earliest event, so the earliest
//! marker always anchors at offset 0 regardless of where the events sit
//! in the source video. Clips appear in first-seen group order; nothing
//! is re-sorted.

use tracing::debug;

use super::{Clip, Marker, MarkerColor, MarkerMetadata, MediaReference, TimelineDocument, Track};
use crate::config::PipelineConfig;
use crate::events::{DetectionEvent, EventSet};
use crate::{CoreError, CoreResult, Ratio, TimeRange, TimeSec};

/// Name of the assembled timeline
pub const TIMELINE_NAME: &str = "Filtered Detection Tags";

/// Name of the single track carrying the clips
pub const TRACK_NAME: &str = "Filtered";

/// Builds the timeline document for a selected event subset.
///
/// The selection must contain at least one event. Calling this twice on
/// the same selection produces structurally identical documents.
pub fn build_timeline(selected: &EventSet, config: &PipelineConfig) -> CoreResult<TimelineDocument> {
    if selected.is_empty() {
        return Err(CoreError::EmptySelection);
    }

    // Group by file name, preserving first-seen order and the input
    // order of events within each group.
    let mut groups: Vec<(&str, Vec<&DetectionEvent>)> = Vec::new();
    for event in selected {
        match groups
            .iter_mut()
            .find(|(file, _)| *file == event.file_name)
        {
            Some((_, members)) => members.push(event),
            None => groups.push((event.file_name.as_str(), vec![event])),
        }
    }

    let mut track = Track::new_video(TRACK_NAME);
    for (file_name, members) in groups {
        let min_time = members
            .iter()
            .map(|event| event.start_time)
            .fold(f64::INFINITY, f64::min);

        let mut clip = clip_shell(file_name, 0.0, config);
        for event in members {
            let offset = event.start_time - min_time;
            debug!("Marker at {:.2}s for {}", offset, event.label);
            clip.add_marker(event_marker(event, offset, config));
        }
        track.add_clip(clip);
    }

    let mut document = TimelineDocument::new(TIMELINE_NAME, frame_rate(config));
    document.add_track(track);
    Ok(document)
}

/// Builds a single-event clip for inspection.
///
/// Unlike [`build_timeline`], the clip's source range starts at the
/// event's absolute start time and its marker anchors at offset 0.
pub fn build_preview_clip(event: &DetectionEvent, config: &PipelineConfig) -> Clip {
    debug!(
        "Creating preview clip for {} at time {}s",
        event.file_name, event.start_time
    );
    let mut clip = clip_shell(&event.file_name, event.start_time, config);
    clip.add_marker(event_marker(event, 0.0, config));
    clip
}

/// Clip over the fixed source window, named after its file
fn clip_shell(file_name: &str, source_start: TimeSec, config: &PipelineConfig) -> Clip {
    Clip::new(
        &format!("{} Tags", file_name),
        MediaReference::new(file_name, TimeRange::new(0.0, config.max_window_sec)),
        TimeRange::with_duration(source_start, config.max_window_sec),
    )
}

fn event_marker(event: &DetectionEvent, offset: TimeSec, config: &PipelineConfig) -> Marker {
    let kind_name = event.kind.as_str();
    Marker::new(
        &event.label,
        TimeRange::with_duration(offset, config.marker_duration_sec),
        MarkerColor::for_kind_name(kind_name),
        MarkerMetadata {
            label_type: kind_name.to_string(),
            confidence: event.confidence,
        },
    )
}

fn frame_rate(config: &PipelineConfig) -> Ratio {
    Ratio::new(config.frame_rate as i32, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    fn event(file: &str, kind: EventKind, label: &str, start_time: f64) -> DetectionEvent {
        DetectionEvent {
            file_name: file.to_string(),
            kind,
            label: label.to_string(),
            start_time,
            duration: 1.0,
            confidence: 90.0,
        }
    }

    fn selection(events: Vec<DetectionEvent>) -> EventSet {
        events.into_iter().collect()
    }

    #[test]
    fn test_empty_selection_rejected() {
        let result = build_timeline(&EventSet::default(), &PipelineConfig::default());
        assert!(matches!(result, Err(CoreError::EmptySelection)));
    }

    #[test]
    fn test_offsets_normalized_per_clip() {
        let selected = selection(vec![
            event("a.mp4", EventKind::ObjectLabel, "car", 5.0),
            event("a.mp4", EventKind::ObjectLabel, "truck", 5.0),
            event("a.mp4", EventKind::TextDetection, "stop", 12.5),
        ]);

        let doc = build_timeline(&selected, &PipelineConfig::default()).unwrap();
        let clip = &doc.tracks[0].clips[0];

        let offsets: Vec<f64> = clip
            .markers
            .iter()
            .map(|m| m.marked_range.start_sec)
            .collect();
        assert_eq!(offsets, vec![0.0, 0.0, 7.5]);
    }

    #[test]
    fn test_normalization_independent_across_files() {
        let selected = selection(vec![
            event("a.mp4", EventKind::ObjectLabel, "car", 100.0),
            event("b.mp4", EventKind::FaceMatch, "jane", 3.0),
            event("a.mp4", EventKind::ObjectLabel, "truck", 110.0),
        ]);

        let doc = build_timeline(&selected, &PipelineConfig::default()).unwrap();
        let clips = &doc.tracks[0].clips;

        // Each clip anchors its own earliest event at offset 0.
        assert_eq!(clips[0].markers[0].marked_range.start_sec, 0.0);
        assert_eq!(clips[0].markers[1].marked_range.start_sec, 10.0);
        assert_eq!(clips[1].markers[0].marked_range.start_sec, 0.0);
    }

    #[test]
    fn test_one_clip_per_file_first_seen_order() {
        let selected = selection(vec![
            event("b.mp4", EventKind::ObjectLabel, "car", 1.0),
            event("a.mp4", EventKind::FaceMatch, "jane", 2.0),
            event("b.mp4", EventKind::TextDetection, "stop", 3.0),
        ]);

        let doc = build_timeline(&selected, &PipelineConfig::default()).unwrap();
        let names: Vec<&str> = doc.tracks[0]
            .clips
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["b.mp4 Tags", "a.mp4 Tags"]);
        assert_eq!(doc.tracks[0].clips[0].markers.len(), 2);
        assert_eq!(doc.tracks[0].clips[1].markers.len(), 1);
    }

    #[test]
    fn test_marker_colors_and_metadata() {
        let selected = selection(vec![
            event("a.mp4", EventKind::FaceMatch, "jane", 1.0),
            event("a.mp4", EventKind::ObjectLabel, "car", 2.0),
            event("a.mp4", EventKind::TextDetection, "stop", 3.0),
        ]);

        let doc = build_timeline(&selected, &PipelineConfig::default()).unwrap();
        let markers = &doc.tracks[0].clips[0].markers;

        assert_eq!(markers[0].color, MarkerColor::Blue);
        assert_eq!(markers[1].color, MarkerColor::Green);
        assert_eq!(markers[2].color, MarkerColor::Magenta);
        assert_eq!(markers[0].metadata.label_type, "Face");
        assert_eq!(markers[1].metadata.label_type, "Label");
        assert_eq!(markers[2].metadata.label_type, "Text");
        assert_eq!(markers[0].metadata.confidence, 90.0);
    }

    #[test]
    fn test_marker_duration_fixed() {
        let selected = selection(vec![event("a.mp4", EventKind::ObjectLabel, "car", 7.0)]);

        let doc = build_timeline(&selected, &PipelineConfig::default()).unwrap();
        let marker = &doc.tracks[0].clips[0].markers[0];
        assert_eq!(marker.marked_range.duration(), 1.0);
    }

    #[test]
    fn test_clip_window_and_frame_rate_from_config() {
        let config = PipelineConfig {
            max_window_sec: 60.0,
            frame_rate: 30,
            ..PipelineConfig::default()
        };
        let selected = selection(vec![event("a.mp4", EventKind::ObjectLabel, "car", 7.0)]);

        let doc = build_timeline(&selected, &config).unwrap();
        let clip = &doc.tracks[0].clips[0];

        assert_eq!(clip.media_reference.available_range.duration(), 60.0);
        assert_eq!(clip.source_range, TimeRange::new(0.0, 60.0));
        assert_eq!(doc.frame_rate, Ratio::new(30, 1));
    }

    #[test]
    fn test_idempotent_build() {
        let selected = selection(vec![
            event("a.mp4", EventKind::FaceMatch, "jane", 5.0),
            event("b.mp4", EventKind::ObjectLabel, "car", 2.0),
        ]);
        let config = PipelineConfig::default();

        let first = build_timeline(&selected, &config).unwrap();
        let second = build_timeline(&selected, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_clip() {
        let config = PipelineConfig::default();
        let e = event("a.mp4", EventKind::FaceMatch, "jane", 42.0);

        let clip = build_preview_clip(&e, &config);

        assert_eq!(clip.name, "a.mp4 Tags");
        assert_eq!(clip.media_reference.target_url, "a.mp4");
        // Source range starts at the event's absolute time...
        assert_eq!(clip.source_range.start_sec, 42.0);
        assert_eq!(clip.source_range.duration(), 180.0);
        // ...while the single marker anchors at offset 0.
        assert_eq!(clip.markers.len(), 1);
        assert_eq!(clip.markers[0].marked_range.start_sec, 0.0);
        assert_eq!(clip.markers[0].color, MarkerColor::Blue);
    }
}
