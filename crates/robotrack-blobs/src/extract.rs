use robotrack_core::{BoundingBox, MaskView};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentAccumulator};
use crate::label::label_components;

/// How foreground regions are extracted for one frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// One pass accumulating all foreground of a color as a single component.
    DirectCount,
    /// Full 8-connected labeling, one component per region.
    Labeling,
}

/// Direct counting when the ROI spans less than `1/divisor` of the frame on
/// both axes, labeling otherwise.
pub fn choose_strategy(
    roi: &BoundingBox,
    frame_width: usize,
    frame_height: usize,
    divisor: u32,
) -> ExtractionStrategy {
    let divisor = divisor.max(1) as usize;
    let small_x = (roi.width_span() as usize) < frame_width / divisor;
    let small_y = (roi.height_span() as usize) < frame_height / divisor;
    if small_x && small_y {
        ExtractionStrategy::DirectCount
    } else {
        ExtractionStrategy::Labeling
    }
}

/// Accumulate every foreground pixel of `mask` inside `region` (clipped to
/// the mask). `None` when the region holds no foreground.
pub fn count_pixels(mask: &MaskView<'_>, region: BoundingBox) -> Option<Component> {
    if mask.is_empty() {
        return None;
    }
    let region = region.intersect(&BoundingBox::frame(mask.width, mask.height))?;
    let (x0, x1) = (region.min_x as usize, region.max_x as usize);

    let mut acc = ComponentAccumulator::new();
    for y in region.min_y..=region.max_y {
        let row = &mask.row(y as usize)[x0..=x1];
        for (dx, &v) in row.iter().enumerate() {
            if v > 0 {
                acc.add((x0 + dx) as u32, y);
            }
        }
    }
    acc.finish()
}

/// Extract the candidate components of one mask inside `roi`.
pub fn extract_components(
    mask: &MaskView<'_>,
    roi: BoundingBox,
    strategy: ExtractionStrategy,
) -> Vec<Component> {
    match strategy {
        ExtractionStrategy::DirectCount => count_pixels(mask, roi).into_iter().collect(),
        ExtractionStrategy::Labeling => label_components(mask, roi).components,
    }
}
