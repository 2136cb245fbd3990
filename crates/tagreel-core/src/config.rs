//! Pipeline Configuration
//!
//! Collects the adjustable constants of the pipeline into a single
//! explicit structure, instead of scattering defaults through call
//! sites. Passed once into the event loader and the timeline assembler.
//!
//! Persistence is optional: [`PipelineConfig::load_or_default`] reads a
//! JSON file and falls back to defaults on any problem, and
//! [`PipelineConfig::save`] writes atomically (temp file + rename).

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{CoreResult, TimeSec};

/// Adjustable pipeline parameters with documented defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Maximum time window in seconds; events starting later are
    /// discarded at load time
    #[serde(default = "default_max_window_sec")]
    pub max_window_sec: TimeSec,

    /// Minimum confidence (0-100); events below are discarded at load
    /// time
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Frame rate used for exported clips
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Fixed duration of every marker in seconds
    #[serde(default = "default_marker_duration_sec")]
    pub marker_duration_sec: TimeSec,
}

fn default_max_window_sec() -> TimeSec {
    180.0
}

fn default_min_confidence() -> f64 {
    70.0
}

fn default_frame_rate() -> u32 {
    24
}

fn default_marker_duration_sec() -> TimeSec {
    1.0
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_window_sec: default_max_window_sec(),
            min_confidence: default_min_confidence(),
            frame_rate: default_frame_rate(),
            marker_duration_sec: default_marker_duration_sec(),
        }
    }
}

impl PipelineConfig {
    /// Normalizes and clamps values so a loaded config is always valid.
    ///
    /// Intentionally tolerant: corrects bad values instead of failing,
    /// so an old or hand-edited config file never aborts the pipeline.
    pub fn normalize(&mut self) {
        if !self.max_window_sec.is_finite() || self.max_window_sec <= 0.0 {
            warn!(
                "Invalid max window {}s, resetting to {}s",
                self.max_window_sec,
                default_max_window_sec()
            );
            self.max_window_sec = default_max_window_sec();
        }
        if !self.min_confidence.is_finite() {
            self.min_confidence = default_min_confidence();
        }
        self.min_confidence = self.min_confidence.clamp(0.0, 100.0);
        if self.frame_rate == 0 {
            warn!("Frame rate of 0 is not usable, resetting to {}", default_frame_rate());
            self.frame_rate = default_frame_rate();
        }
        if !self.marker_duration_sec.is_finite() || self.marker_duration_sec <= 0.0 {
            self.marker_duration_sec = default_marker_duration_sec();
        }
    }

    /// Loads a config from a JSON file, returning defaults if the file
    /// is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("Config file {:?} not found, using defaults", path);
            return Self::default();
        }

        let loaded = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Self>(&content).map_err(|e| e.to_string())
            });

        match loaded {
            Ok(mut config) => {
                config.normalize();
                config
            }
            Err(e) => {
                warn!("Failed to load config {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    /// Saves the config to a JSON file using an atomic write
    /// (temp file + rename)
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let mut normalized = self.clone();
        normalized.normalize();
        let content = serde_json::to_string_pretty(&normalized)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        info!("Config saved to {:?}", path);
        Ok(())
    }
}
