//! Robot poses from colored circular markers.
//!
//! Every robot carries a *body* marker in its own color and a *heading*
//! marker in a color shared by all robots. Per frame, [`RobotTracker::track`]:
//! 1. reduces the scanned area to the foreground ROI of all channel masks,
//! 2. extracts and selects one body blob per body channel,
//! 3. looks for a heading marker around each body (or over the whole ROI),
//! 4. pairs each heading marker with its nearest body and derives a compass
//!    heading (0° = up, clockwise),
//! 5. assembles one [`Pose`] per robot slot.
//!
//! Frames are independent: slot `i` is always the `i`-th body channel, not a
//! tracked identity.
//!
//! ## Quickstart
//!
//! ```
//! use robotrack_core::Mask;
//! use robotrack_pose::{RobotTracker, TrackerParams};
//!
//! let params = TrackerParams::default();
//! let tracker = RobotTracker::new(params).expect("valid params");
//!
//! // One mask per configured channel (red, green, blue, yellow).
//! let masks: Vec<Mask> = (0..4).map(|_| Mask::new(320, 240)).collect();
//! let views: Vec<_> = masks.iter().map(Mask::view).collect();
//! let frame = tracker.track(&views).expect("well-formed masks");
//! assert_eq!(frame.poses.len(), 3);
//! assert!(frame.poses.iter().all(|p| !p.detected));
//! ```

mod assemble;
mod correspondence;
mod heading_search;
mod issue;
mod params;
mod tracker;

pub use assemble::{
    assemble_poses, build_overlay, sentinel_position, Overlay, OverlayBox, OverlayText, Pose,
    TrackedMarker,
};
pub use correspondence::{
    compass_heading, direction_angle_deg, heading_degrees, match_headings, nearest_body,
    resolve_body_headings, HeadingMatch,
};
pub use heading_search::{search_heading_markers, LocalSearch, SearchWindow};
pub use issue::{FrameIssue, TrackError};
pub use params::{
    ChannelSpec, HeadingSearchMode, HeadingSearchParams, MarkerRole, ParamsError, TrackerParams,
};
pub use tracker::{FrameResult, RobotTracker};

pub use robotrack_blobs::{ExtractionStrategy, SizeWindow};
