//! Facade crate for the `robotrack-*` workspace.
//!
//! This crate provides:
//! - re-exports of the mask, blob and pose crates,
//! - JSON configuration and report types ([`io`]),
//! - (feature `image`) mask loading from image files and an end-to-end
//!   [`track::track_config`] helper,
//! - (feature `cli`) the `robotrack` command-line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use robotrack::io::TrackConfig;
//! use robotrack::track::track_config;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = Path::new("scene.json");
//! let cfg = TrackConfig::load_json(path)?;
//! let report = track_config(&cfg, path, 1)?;
//! for pose in &report.poses {
//!     println!("{}: {:?} {:?}", pose.channel, pose.position, pose.orientation_deg);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `robotrack::core`: masks, bounding boxes, logger.
//! - `robotrack::blobs`: ROI reduction, labeling, blob selection.
//! - `robotrack::pose`: heading search, correspondence, [`RobotTracker`].

pub use robotrack_blobs as blobs;
pub use robotrack_core as core;
pub use robotrack_pose as pose;

pub use robotrack_core::{BoundingBox, Mask, MaskView};
pub use robotrack_pose::{FrameIssue, FrameResult, Pose, RobotTracker, TrackerParams};

pub mod io;
pub mod stats;

#[cfg(feature = "image")]
pub mod load;
#[cfg(feature = "image")]
pub mod track;
