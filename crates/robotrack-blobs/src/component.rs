use nalgebra::Point2;
use robotrack_core::BoundingBox;
use serde::{Deserialize, Serialize};

/// One connected foreground region (or, on the direct-count path, all
/// foreground of one color inside the scanned rectangle).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Always > 0.
    pub pixel_count: u32,
    /// Mean pixel coordinate, `x` = column, `y` = row.
    pub centroid: Point2<f32>,
    pub bbox: BoundingBox,
}

/// Running pixel statistics for one region.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentAccumulator {
    pixel_count: u32,
    sum_x: u64,
    sum_y: u64,
    bbox: Option<BoundingBox>,
}

impl ComponentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, x: u32, y: u32) {
        self.pixel_count += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        match &mut self.bbox {
            Some(b) => b.include(x, y),
            None => self.bbox = Some(BoundingBox::from_point(x, y)),
        }
    }

    /// `None` when no pixel was added, so the mean never divides by zero.
    pub fn finish(&self) -> Option<Component> {
        let bbox = self.bbox?;
        let n = self.pixel_count as f64;
        Some(Component {
            pixel_count: self.pixel_count,
            centroid: Point2::new(
                (self.sum_x as f64 / n) as f32,
                (self.sum_y as f64 / n) as f32,
            ),
            bbox,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_accumulator_yields_nothing() {
        assert!(ComponentAccumulator::new().finish().is_none());
    }

    #[test]
    fn centroid_is_mean_of_added_pixels() {
        let mut acc = ComponentAccumulator::new();
        for (x, y) in [(2, 4), (4, 4), (3, 7)] {
            acc.add(x, y);
        }
        let c = acc.finish().expect("component");
        assert_eq!(c.pixel_count, 3);
        assert_relative_eq!(c.centroid.x, 3.0);
        assert_relative_eq!(c.centroid.y, 5.0);
        assert_eq!(
            c.bbox,
            BoundingBox {
                min_x: 2,
                min_y: 4,
                max_x: 4,
                max_y: 7
            }
        );
    }
}
