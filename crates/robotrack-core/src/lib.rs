//! Core types for colored-marker robot tracking.
//!
//! This crate is intentionally small. It knows about binary masks and pixel
//! rectangles only; it does not threshold images, label blobs or compute
//! poses. Masks are produced externally (color conversion + thresholding +
//! morphology) and handed in as row-major `u8` buffers where any value `> 0`
//! is foreground.

mod geometry;
mod logger;
mod mask;

pub use geometry::BoundingBox;
pub use mask::{Mask, MaskError, MaskView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
