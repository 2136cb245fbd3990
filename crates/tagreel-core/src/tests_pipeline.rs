//! End-to-end pipeline tests: CSV fixtures on disk through load, query,
//! assembly and export.

use std::fs;

use tempfile::TempDir;

use crate::config::PipelineConfig;
use crate::events::{load_events, EventKind, EventSources};
use crate::export::{JsonTimelineWriter, TimelineWriter, DEFAULT_EXPORT_FILE_NAME};
use crate::query::{query, Criterion};
use crate::timeline::{build_timeline, TimelineDocument};

fn write_fixture_sources(dir: &TempDir) -> EventSources {
    // Two files carry a "jane" face match; cam_c has none. A low
    // confidence row and an out-of-window row must never surface.
    fs::write(
        dir.path().join("faces.csv"),
        "Video,Timestamp(ms),Confidence,MatchedName\n\
         /ingest/cam_a.mp4,15000,95.0,Jane Doe\n\
         /ingest/cam_a.mp4,42000,88.0,Jane Doe\n\
         /ingest/cam_b.mp4,9000,91.5,jane doe\n\
         /ingest/cam_b.mp4,10000,42.0,jane doe\n\
         /ingest/cam_c.mp4,5000,99.0,John Smith\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("labels.csv"),
        "Video,Timestamp(ms),Confidence,Label\n\
         /ingest/cam_a.mp4,16000,80.0,Car\n\
         /ingest/cam_c.mp4,200000,99.0,Dog\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("text.csv"),
        "Video,Timestamp(ms),Confidence,DetectedText\n\
         /ingest/cam_b.mp4,12000,75.0, Stop Sign \n",
    )
    .unwrap();
    EventSources::from_dir(dir.path())
}

#[test]
fn test_load_query_build_export() {
    let dir = TempDir::new().unwrap();
    let sources = write_fixture_sources(&dir);
    let config = PipelineConfig::default();

    let report = load_events(&sources, &config);
    assert!(report.failures.is_empty());
    // Dropped: cam_b's 42.0-confidence face, cam_c's 200s dog label.
    assert_eq!(report.events.len(), 6);

    let selected = query(
        &report.events,
        &[Criterion::new(EventKind::FaceMatch, "jane")],
    )
    .unwrap();

    // Both jane files qualify; only face-matching events return.
    let files: Vec<&str> = selected.iter().map(|e| e.file_name.as_str()).collect();
    assert_eq!(files, vec!["cam_a.mp4", "cam_a.mp4", "cam_b.mp4"]);

    let document = build_timeline(&selected, &config).unwrap();
    assert_eq!(document.clip_count(), 2);

    // Each clip's earliest marker anchors at offset 0.
    for clip in &document.tracks[0].clips {
        let min_offset = clip
            .markers
            .iter()
            .map(|m| m.marked_range.start_sec)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min_offset, 0.0);
    }
    // cam_a's second event keeps its relative spacing (42s - 15s).
    assert_eq!(
        document.tracks[0].clips[0].markers[1].marked_range.start_sec,
        27.0
    );

    let out_path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);
    JsonTimelineWriter
        .write_timeline(&document, &out_path)
        .unwrap();

    let parsed: TimelineDocument =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed, document);
}

#[test]
fn test_query_combination_with_no_common_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let sources = write_fixture_sources(&dir);

    let report = load_events(&sources, &PipelineConfig::default());
    let selected = query(
        &report.events,
        &[
            Criterion::new(EventKind::FaceMatch, "jane"),
            Criterion::new(EventKind::TextDetection, "stop"),
            Criterion::new(EventKind::ObjectLabel, "car"),
        ],
    )
    .unwrap();

    // cam_a lacks text, cam_b lacks a label: no file matches all three.
    assert!(selected.is_empty());
}

#[test]
fn test_partial_source_availability() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("text.csv"),
        "Video,Timestamp(ms),Confidence,DetectedText\ncam_a.mp4,1000,90.0,exit\n",
    )
    .unwrap();
    let sources = EventSources::from_dir(dir.path());

    let report = load_events(&sources, &PipelineConfig::default());
    assert!(report.failures.is_empty());
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events.events()[0].kind, EventKind::TextDetection);
}
