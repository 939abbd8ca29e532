//! Blob extraction on per-color binary masks.
//!
//! Per frame:
//! 1. [`foreground_roi`] shrinks the scanned area to the bounding rectangle of
//!    all foreground (row scan and column scan, independently).
//! 2. [`choose_strategy`] picks direct pixel counting when the ROI is small
//!    (a single, well isolated blob per color is assumed) and full
//!    8-connected labeling otherwise.
//! 3. [`select`] drops implausibly sized components and reduces the rest to
//!    the expected count per color.
//!
//! All working state (label grid, flood-fill stack, component lists) is
//! allocated per call; nothing is carried from one frame to the next.

mod component;
mod extract;
mod label;
mod roi;
mod select;

pub use component::{Component, ComponentAccumulator};
pub use extract::{choose_strategy, count_pixels, extract_components, ExtractionStrategy};
pub use label::{label_components, LabelGrid, Labeling, UNLABELED};
pub use roi::{combined_roi, foreground_roi, foreground_roi_within};
pub use select::{select, select_first_k, select_largest, InstancePolicy, Selection, SizeWindow};
