//! 8-connected component labeling with an explicit-stack flood fill.

use robotrack_core::{BoundingBox, MaskView};

use crate::component::{Component, ComponentAccumulator};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Label value of a pixel no region has claimed yet.
pub const UNLABELED: u32 = 0;

/// Flat, row-major label grid with the same dimensions as the mask.
///
/// A grid is created unlabeled for each extraction call; labels start at 1.
#[derive(Clone, Debug)]
pub struct LabelGrid {
    width: usize,
    height: usize,
    labels: Vec<u32>,
    regions: u32,
}

impl LabelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            labels: vec![UNLABELED; width * height],
            regions: 0,
        }
    }

    /// Forget every label.
    pub fn reset(&mut self) {
        self.labels.fill(UNLABELED);
        self.regions = 0;
    }

    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.width + x]
    }

    /// Number of regions labeled so far.
    pub fn regions(&self) -> u32 {
        self.regions
    }

    /// Grow a new region from `(seed_x, seed_y)` over 8-connected foreground.
    ///
    /// Returns `None` when the seed is background or already labeled. Pixels
    /// are labeled when pushed, so each one is visited once. `stack` is
    /// scratch space reused between calls.
    pub fn flood_fill(
        &mut self,
        mask: &MaskView<'_>,
        seed_x: usize,
        seed_y: usize,
        stack: &mut Vec<(u32, u32)>,
    ) -> Option<Component> {
        debug_assert!(mask.width == self.width && mask.height == self.height);
        let seed = seed_y * self.width + seed_x;
        if mask.data[seed] == 0 || self.labels[seed] != UNLABELED {
            return None;
        }

        self.regions += 1;
        let label = self.regions;
        let w = self.width;
        let (max_x, max_y) = (self.width - 1, self.height - 1);

        let mut acc = ComponentAccumulator::new();
        stack.clear();
        self.labels[seed] = label;
        stack.push((seed_x as u32, seed_y as u32));

        while let Some((x, y)) = stack.pop() {
            acc.add(x, y);
            let (x, y) = (x as usize, y as usize);
            for ny in y.saturating_sub(1)..=(y + 1).min(max_y) {
                for nx in x.saturating_sub(1)..=(x + 1).min(max_x) {
                    let idx = ny * w + nx;
                    if self.labels[idx] == UNLABELED && mask.data[idx] > 0 {
                        self.labels[idx] = label;
                        stack.push((nx as u32, ny as u32));
                    }
                }
            }
        }

        acc.finish()
    }
}

/// Components of one mask plus the label grid that produced them.
#[derive(Clone, Debug)]
pub struct Labeling {
    /// In scan order: sorted by the row, then column, of each region's seed.
    pub components: Vec<Component>,
    pub grid: LabelGrid,
}

/// Label every foreground pixel reachable from seeds inside `roi`.
///
/// Seeds are visited row by row, so the output order is deterministic.
/// Regions may extend past `roi`; with the ROI from
/// [`foreground_roi`](crate::foreground_roi) they never need to.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width, height = mask.height))
)]
pub fn label_components(mask: &MaskView<'_>, roi: BoundingBox) -> Labeling {
    let mut grid = LabelGrid::new(mask.width, mask.height);
    let mut components = Vec::new();
    if mask.is_empty() {
        return Labeling { components, grid };
    }
    let Some(roi) = roi.intersect(&BoundingBox::frame(mask.width, mask.height)) else {
        return Labeling { components, grid };
    };

    let mut stack = Vec::new();
    for y in roi.min_y as usize..=roi.max_y as usize {
        for x in roi.min_x as usize..=roi.max_x as usize {
            if !mask.is_foreground(x, y) || grid.label_at(x, y) != UNLABELED {
                continue;
            }
            if let Some(c) = grid.flood_fill(mask, x, y, &mut stack) {
                components.push(c);
            }
        }
    }

    log::trace!(
        "labeled {} regions in roi {:?}",
        components.len(),
        (roi.min_x, roi.min_y, roi.max_x, roi.max_y)
    );
    Labeling { components, grid }
}
