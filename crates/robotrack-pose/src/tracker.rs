use robotrack_blobs::{
    choose_strategy, combined_roi, extract_components, foreground_roi_within, label_components,
    select, Component, ExtractionStrategy, InstancePolicy, Selection,
};
use robotrack_core::{BoundingBox, MaskError, MaskView};
use serde::{Deserialize, Serialize};

use crate::assemble::{assemble_poses, build_overlay, Overlay, Pose, TrackedMarker};
use crate::correspondence::{match_headings, resolve_body_headings, HeadingMatch};
use crate::heading_search::{search_heading_markers, LocalSearch};
use crate::issue::{FrameIssue, TrackError};
use crate::params::{HeadingSearchMode, ParamsError, TrackerParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Everything computed for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub frame_width: usize,
    pub frame_height: usize,
    /// Foreground ROI of all channels; `None` for an all-background frame.
    pub roi: Option<BoundingBox>,
    pub strategy: Option<ExtractionStrategy>,
    /// One entry per body slot.
    pub bodies: Vec<TrackedMarker>,
    /// Heading markers that entered correspondence.
    pub headings: Vec<TrackedMarker>,
    /// Local window searches, one per slot (empty in global mode).
    pub searches: Vec<LocalSearch>,
    pub matches: Vec<HeadingMatch>,
    pub poses: Vec<Pose>,
    pub issues: Vec<FrameIssue>,
    pub overlay: Overlay,
}

impl FrameResult {
    pub fn detected_count(&self) -> usize {
        self.poses.iter().filter(|p| p.detected).count()
    }
}

/// Per-frame robot tracker.
///
/// Holds only validated configuration; all working state (label grids,
/// component lists) is allocated per call, so frames never influence
/// each other.
#[derive(Clone, Debug)]
pub struct RobotTracker {
    params: TrackerParams,
}

impl RobotTracker {
    pub fn new(params: TrackerParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Run the full pipeline on one frame.
    ///
    /// `masks` holds one binary mask per configured channel, in channel order,
    /// all of the same size.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, masks), fields(channels = masks.len()))
    )]
    pub fn track(&self, masks: &[MaskView<'_>]) -> Result<FrameResult, TrackError> {
        let (width, height) = self.check_masks(masks)?;
        let params = &self.params;
        let slots = params.robot_count;
        let mut issues = Vec::new();

        let roi = combined_roi(masks)?;
        let strategy = roi.map(|r| choose_strategy(&r, width, height, params.direct_count_divisor));
        log::debug!("frame {width}x{height}: roi {roi:?}, strategy {strategy:?}");

        let mut bodies: Vec<Option<Component>> = Vec::with_capacity(slots);
        for (channel, spec) in params.body_channels() {
            let components = match (roi, strategy) {
                (Some(roi), Some(strategy)) => extract(&masks[channel], roi, strategy),
                _ => Vec::new(),
            };
            let selection = select(&components, params.size_window, InstancePolicy::Single);
            note_selection(&mut issues, &spec.name, &selection);
            bodies.push(selection.kept.first().copied());
        }

        let heading_channel = params
            .heading_channel()
            .ok_or(ParamsError::HeadingChannelCount(0))?;
        let heading_name = params.channels[heading_channel].name.as_str();
        let heading_mask = &masks[heading_channel];

        let mut searches = Vec::new();
        let markers: Vec<Component> = match params.heading_search.mode {
            HeadingSearchMode::Local => {
                searches = search_heading_markers(heading_mask, &bodies, &params.heading_search);
                for s in searches.iter().filter(|s| s.clipped) {
                    issues.push(FrameIssue::WindowOutOfBounds { slot: s.slot });
                }
                let found: Vec<Component> = searches.iter().filter_map(|s| s.marker).collect();
                if found.is_empty() && bodies.iter().any(Option::is_some) {
                    issues.push(FrameIssue::NoForegroundPixels {
                        channel: heading_name.to_string(),
                    });
                }
                found
            }
            HeadingSearchMode::Global => {
                let components = roi
                    .and_then(|r| foreground_roi_within(heading_mask, r))
                    .map(|r| label_components(heading_mask, r).components)
                    .unwrap_or_default();
                let selection = select(
                    &components,
                    params.heading_window(),
                    InstancePolicy::FirstK(params.heading_count()),
                );
                note_selection(&mut issues, heading_name, &selection);
                selection.kept
            }
        };

        let matches = match_headings(&markers, &bodies, height, params.max_heading_distance_px);
        let per_slot = resolve_body_headings(&matches, slots);
        for m in per_slot.iter().flatten().filter(|m| !m.is_confident()) {
            issues.push(FrameIssue::LowConfidenceMatch {
                marker: m.marker,
                slot: m.slot,
                distance: m.distance,
                threshold: params.max_heading_distance_px,
            });
        }

        let body_markers: Vec<TrackedMarker> = bodies
            .iter()
            .zip(&per_slot)
            .enumerate()
            .map(|(slot, (body, m))| TrackedMarker::body(slot, body.as_ref(), m.as_ref()))
            .collect();
        let heading_markers: Vec<TrackedMarker> = markers
            .iter()
            .enumerate()
            .map(|(i, c)| TrackedMarker::heading(i, c, matches.iter().find(|m| m.marker == i)))
            .collect();

        let names: Vec<&str> = params
            .body_channels()
            .map(|(_, spec)| spec.name.as_str())
            .collect();
        let poses = assemble_poses(&body_markers, &names, width, height, params.pixels_per_unit);
        let overlay = build_overlay(
            &body_markers,
            &heading_markers,
            &poses,
            heading_name,
            width,
            height,
        );

        for issue in &issues {
            log::debug!("frame issue: {issue}");
        }
        let detected = poses.iter().filter(|p| p.detected).count();
        if roi.is_some() && detected == 0 {
            log::warn!("foreground present but no body marker passed the size window");
        }
        log::debug!(
            "{detected}/{slots} bodies, {} heading markers, {} matches",
            markers.len(),
            matches.len()
        );

        Ok(FrameResult {
            frame_width: width,
            frame_height: height,
            roi,
            strategy,
            bodies: body_markers,
            headings: heading_markers,
            searches,
            matches,
            poses,
            issues,
            overlay,
        })
    }

    fn check_masks(&self, masks: &[MaskView<'_>]) -> Result<(usize, usize), TrackError> {
        let channels = &self.params.channels;
        if masks.len() != channels.len() {
            return Err(TrackError::MaskCount {
                expected: channels.len(),
                got: masks.len(),
            });
        }
        let Some(first) = masks.first() else {
            return Err(TrackError::MaskCount {
                expected: channels.len(),
                got: 0,
            });
        };
        if first.is_empty() {
            return Err(TrackError::EmptyFrame);
        }
        for (mask, spec) in masks.iter().zip(channels) {
            mask.check_buffer().map_err(|source| TrackError::MaskSize {
                channel: spec.name.clone(),
                source,
            })?;
            if !mask.same_size(first) {
                return Err(TrackError::MaskSize {
                    channel: spec.name.clone(),
                    source: MaskError::SizeMismatch {
                        width: mask.width,
                        height: mask.height,
                        expected_width: first.width,
                        expected_height: first.height,
                    },
                });
            }
        }
        Ok((first.width, first.height))
    }
}

/// Candidate components of one body channel.
///
/// The labeling path first tightens the frame ROI to this channel's own
/// foreground.
fn extract(mask: &MaskView<'_>, roi: BoundingBox, strategy: ExtractionStrategy) -> Vec<Component> {
    match strategy {
        ExtractionStrategy::DirectCount => extract_components(mask, roi, strategy),
        ExtractionStrategy::Labeling => foreground_roi_within(mask, roi)
            .map(|r| extract_components(mask, r, strategy))
            .unwrap_or_default(),
    }
}

fn note_selection(issues: &mut Vec<FrameIssue>, channel: &str, selection: &Selection) {
    log::debug!(
        "channel `{channel}`: {} components, {} in size window, {} kept",
        selection.candidates,
        selection.in_window,
        selection.kept.len()
    );
    if selection.is_empty() {
        issues.push(FrameIssue::NoForegroundPixels {
            channel: channel.to_string(),
        });
    } else if selection.is_ambiguous() {
        issues.push(FrameIssue::AmbiguousCandidateSet {
            channel: channel.to_string(),
            candidates: selection.in_window,
            kept: selection.kept.len(),
        });
    }
}
