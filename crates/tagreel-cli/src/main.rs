//! tagreel CLI
//!
//! Headless driver for the pipeline: load the configured detection
//! sources, optionally filter them with per-category needles, and
//! export the assembled timeline document.
//!
//! The interactive selection surface of the GUI is out of scope here;
//! `export` treats the full query result as the selection.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tagreel_core::config::PipelineConfig;
use tagreel_core::events::{load_events, EventKind, EventSet, EventSources, LoadReport};
use tagreel_core::export::{JsonTimelineWriter, TimelineWriter, DEFAULT_EXPORT_FILE_NAME};
use tagreel_core::query::{query, Criterion};
use tagreel_core::timeline::build_timeline;

#[derive(Parser)]
#[command(name = "tagreel", version, about = "Detection events to editorial timelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load all configured sources and print the surviving events
    List {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Load, then print the events matching the given needles
    Query {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        needles: NeedleArgs,
    },
    /// Load, query, and export the matching events as a timeline
    Export {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        needles: NeedleArgs,
        /// Destination path for the timeline document
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

/// Source locations and pipeline parameter overrides
#[derive(Args)]
struct PipelineArgs {
    /// Directory holding labels.csv / faces.csv / text.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Object label source file
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Face match source file
    #[arg(long)]
    faces: Option<PathBuf>,

    /// Text detection source file
    #[arg(long)]
    texts: Option<PathBuf>,

    /// Pipeline config file (JSON); missing file means defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum time window in seconds
    #[arg(long)]
    max_window: Option<f64>,

    /// Minimum confidence (0-100)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Frame rate for exported clips
    #[arg(long)]
    fps: Option<u32>,
}

impl PipelineArgs {
    fn config(&self) -> PipelineConfig {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_or_default(path),
            None => PipelineConfig::default(),
        };
        if let Some(max_window) = self.max_window {
            config.max_window_sec = max_window;
        }
        if let Some(min_confidence) = self.min_confidence {
            config.min_confidence = min_confidence;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        config.normalize();
        config
    }

    fn sources(&self) -> EventSources {
        let mut sources = match &self.data_dir {
            Some(dir) => EventSources::from_dir(dir),
            None => EventSources::new(),
        };
        if let Some(path) = &self.labels {
            sources = sources.with_object_labels(path.clone());
        }
        if let Some(path) = &self.faces {
            sources = sources.with_face_matches(path.clone());
        }
        if let Some(path) = &self.texts {
            sources = sources.with_text_detections(path.clone());
        }
        sources
    }

    fn load(&self) -> (EventSet, PipelineConfig) {
        let config = self.config();
        let LoadReport { events, failures } = load_events(&self.sources(), &config);
        for failure in &failures {
            warn!(
                "Skipped {} source {:?}: {}",
                failure.kind.as_str(),
                failure.path,
                failure.reason
            );
        }
        (events, config)
    }
}

/// Per-category search needles
#[derive(Args)]
struct NeedleArgs {
    /// Face match needle (matched identity substring)
    #[arg(long)]
    face: Option<String>,

    /// Object label needle
    #[arg(long)]
    label: Option<String>,

    /// Detected text needle
    #[arg(long)]
    text: Option<String>,
}

impl NeedleArgs {
    fn criteria(&self) -> Vec<Criterion> {
        let mut criteria = Vec::new();
        if let Some(needle) = &self.face {
            criteria.push(Criterion::new(EventKind::FaceMatch, needle));
        }
        if let Some(needle) = &self.label {
            criteria.push(Criterion::new(EventKind::ObjectLabel, needle));
        }
        if let Some(needle) = &self.text {
            criteria.push(Criterion::new(EventKind::TextDetection, needle));
        }
        criteria
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::List { pipeline } => {
            let (events, _) = pipeline.load();
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Command::Query { pipeline, needles } => {
            let (events, _) = pipeline.load();
            let matched = query(&events, &needles.criteria())?;
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }
        Command::Export {
            pipeline,
            needles,
            output,
        } => {
            let (events, config) = pipeline.load();
            let selected = query(&events, &needles.criteria())?;
            let document = build_timeline(&selected, &config)
                .context("No events matched the given needles")?;
            JsonTimelineWriter.write_timeline(&document, &output)?;
            println!("Saved to {}", output.display());
        }
    }
    Ok(())
}
