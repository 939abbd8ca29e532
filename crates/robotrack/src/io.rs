//! JSON configuration and report types.

use robotrack_blobs::ExtractionStrategy;
use robotrack_core::BoundingBox;
use robotrack_pose::{FrameIssue, FrameResult, Overlay, Pose, TrackerParams};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::stats::ProcessingStats;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Input of one tracking run: mask files per channel plus tracker params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Mask image paths keyed by channel name. Several files for one channel
    /// are OR-ed together. Relative paths resolve against the config file.
    pub masks: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub tracker: TrackerParams,
}

impl TrackConfig {
    /// Default params with one `<channel>.png` mask per channel.
    pub fn template() -> Self {
        let tracker = TrackerParams::default();
        let masks = tracker
            .channels
            .iter()
            .map(|c| (c.name.clone(), vec![format!("{}.png", c.name)]))
            .collect();
        Self {
            masks,
            output_path: None,
            tracker,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("robotrack_report.json"))
    }

    /// Mask files of `channel`, resolved against `base_dir`. Empty when the
    /// channel is not listed.
    pub fn mask_paths(&self, channel: &str, base_dir: &Path) -> Vec<PathBuf> {
        self.masks
            .get(channel)
            .map(|paths| paths.iter().map(|p| base_dir.join(p)).collect())
            .unwrap_or_default()
    }
}

/// Output of one tracking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackReport {
    pub config_path: String,
    pub frame_width: usize,
    pub frame_height: usize,
    #[serde(default)]
    pub roi: Option<BoundingBox>,
    #[serde(default)]
    pub strategy: Option<ExtractionStrategy>,
    pub poses: Vec<Pose>,
    #[serde(default)]
    pub issues: Vec<FrameIssue>,
    #[serde(default)]
    pub overlay: Overlay,
    #[serde(default)]
    pub stats: Option<ProcessingStats>,
}

impl TrackReport {
    pub fn new(config_path: &Path, frame: FrameResult) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            frame_width: frame.frame_width,
            frame_height: frame.frame_height,
            roi: frame.roi,
            strategy: frame.strategy,
            poses: frame.poses,
            issues: frame.issues,
            overlay: frame.overlay,
            stats: None,
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
