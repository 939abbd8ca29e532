use serde::{Deserialize, Serialize};

/// Inclusive axis-aligned pixel rectangle, `min <= max` on both axes.
///
/// Used both for blob bounding boxes and for the frame region of interest.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Degenerate box around a single pixel (the first pixel seen).
    pub fn from_point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Whole-frame box. `width` and `height` must be non-zero.
    pub fn frame(width: usize, height: usize) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width.saturating_sub(1) as u32,
            max_y: height.saturating_sub(1) as u32,
        }
    }

    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Horizontal extent `max_x - min_x` (zero for a one-pixel-wide box).
    pub fn width_span(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// Vertical extent `max_y - min_y`.
    pub fn height_span(&self) -> u32 {
        self.max_y - self.min_y
    }

    /// Product of the two spans.
    pub fn span_area(&self) -> u64 {
        self.width_span() as u64 * self.height_span() as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (min_x <= max_x && min_y <= max_y).then_some(BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }
}
