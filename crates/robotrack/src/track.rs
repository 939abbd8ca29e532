//! End-to-end run: config file in, report out.

use robotrack_core::{Mask, MaskView};
use robotrack_pose::{ParamsError, RobotTracker, TrackError};
use std::path::Path;
use std::time::Instant;

use crate::io::{TrackConfig, TrackReport};
use crate::load::{load_frame_masks, LoadError};
use crate::stats::ProcessingStats;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum TrackRunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Load the masks named by `cfg` and track them `repeat` times.
///
/// Every run recomputes the frame from scratch; the report holds the last
/// result and, when `repeat > 1`, timing statistics.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg, config_path), fields(config = %config_path.display()))
)]
pub fn track_config(
    cfg: &TrackConfig,
    config_path: &Path,
    repeat: usize,
) -> Result<TrackReport, TrackRunError> {
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let masks = load_frame_masks(cfg, base_dir)?;
    let views: Vec<MaskView<'_>> = masks.iter().map(Mask::view).collect();
    let tracker = RobotTracker::new(cfg.tracker.clone())?;

    let mut stats = ProcessingStats::default();
    let mut frame = None;
    for _ in 0..repeat.max(1) {
        let started = Instant::now();
        let result = tracker.track(&views)?;
        stats.push(started.elapsed());
        frame = Some(result);
    }
    let Some(frame) = frame else {
        return Err(TrackError::EmptyFrame.into());
    };

    log::info!(
        "{}/{} robots detected, {} issues",
        frame.detected_count(),
        frame.poses.len(),
        frame.issues.len()
    );
    let mut report = TrackReport::new(config_path, frame);
    if stats.frames > 1 {
        log::info!(
            "processing time over {} runs: min {:.3} ms, max {:.3} ms, mean {:.3} ms",
            stats.frames,
            stats.min_ms,
            stats.max_ms,
            stats.mean_ms
        );
        report.stats = Some(stats);
    }
    Ok(report)
}
