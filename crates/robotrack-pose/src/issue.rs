use robotrack_core::MaskError;
use serde::{Deserialize, Serialize};

use crate::params::ParamsError;

/// Recoverable per-frame condition; the frame still yields a full pose list.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameIssue {
    #[error("no plausible blob for channel `{channel}`")]
    NoForegroundPixels { channel: String },
    #[error("channel `{channel}`: {candidates} plausible blobs for {kept} slot(s)")]
    AmbiguousCandidateSet {
        channel: String,
        candidates: usize,
        kept: usize,
    },
    #[error("heading search window of slot {slot} clipped to the frame")]
    WindowOutOfBounds { slot: usize },
    #[error(
        "heading marker {marker} is {distance:.1}px from slot {slot} (threshold {threshold:.1}px)"
    )]
    LowConfidenceMatch {
        marker: usize,
        slot: usize,
        distance: f32,
        threshold: f32,
    },
}

/// Errors returned by [`RobotTracker::track`](crate::RobotTracker::track).
///
/// Only malformed input is an error; detection failures are [`FrameIssue`]s.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("expected {expected} masks (one per channel), got {got}")]
    MaskCount { expected: usize, got: usize },
    #[error("mask for channel `{channel}`: {source}")]
    MaskSize { channel: String, source: MaskError },
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error("frame has zero width or height")]
    EmptyFrame,
}
