use robotrack_blobs::{count_pixels, Component};
use robotrack_core::{BoundingBox, MaskView};
use serde::{Deserialize, Serialize};

use crate::params::HeadingSearchParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Half-open pixel window `[x0, x1) x [y0, y1)`, possibly outside the frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl SearchWindow {
    /// Window centered on `body`'s centroid, reaching `factor` times the
    /// body's box extent on each side. Bounds are truncated toward zero.
    pub fn around(body: &Component, factor: f32) -> Self {
        let cx = body.centroid.x as f64;
        let cy = body.centroid.y as f64;
        let hx = factor as f64 * body.bbox.width_span() as f64;
        let hy = factor as f64 * body.bbox.height_span() as f64;
        Self {
            x0: (cx - hx).trunc() as i64,
            y0: (cy - hy).trunc() as i64,
            x1: (cx + hx).trunc() as i64,
            y1: (cy + hy).trunc() as i64,
        }
    }

    /// True when part of the window lies outside a `width x height` frame.
    pub fn exceeds(&self, width: usize, height: usize) -> bool {
        self.x0 < 0 || self.y0 < 0 || self.x1 > width as i64 || self.y1 > height as i64
    }

    /// Inclusive in-frame part of the window; `None` when nothing is left.
    pub fn clip(&self, width: usize, height: usize) -> Option<BoundingBox> {
        let x0 = self.x0.max(0);
        let y0 = self.y0.max(0);
        let x1 = self.x1.min(width as i64);
        let y1 = self.y1.min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(BoundingBox {
            min_x: x0 as u32,
            min_y: y0 as u32,
            max_x: (x1 - 1) as u32,
            max_y: (y1 - 1) as u32,
        })
    }
}

/// Result of the heading search around one body slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalSearch {
    pub slot: usize,
    /// `None` when the slot has no body blob this frame.
    pub window: Option<SearchWindow>,
    /// The window had to be clipped to the frame.
    pub clipped: bool,
    /// All heading foreground inside the window, as one component.
    pub marker: Option<Component>,
}

/// Count heading-mask pixels in a window around every detected body.
///
/// Produces one entry per slot of `bodies`, in slot order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask, bodies, params), fields(slots = bodies.len()))
)]
pub fn search_heading_markers(
    mask: &MaskView<'_>,
    bodies: &[Option<Component>],
    params: &HeadingSearchParams,
) -> Vec<LocalSearch> {
    let factor = params.half_extent_factor();
    bodies
        .iter()
        .enumerate()
        .map(|(slot, body)| {
            let Some(body) = body else {
                return LocalSearch {
                    slot,
                    window: None,
                    clipped: false,
                    marker: None,
                };
            };
            let window = SearchWindow::around(body, factor);
            let clipped = window.exceeds(mask.width, mask.height);
            let marker = window
                .clip(mask.width, mask.height)
                .and_then(|region| count_pixels(mask, region));
            if clipped {
                log::trace!("slot {slot}: search window {window:?} clipped");
            }
            LocalSearch {
                slot,
                window: Some(window),
                clipped,
                marker,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use robotrack_core::Mask;

    fn body_at(cx: f32, cy: f32, half: u32) -> Component {
        Component {
            pixel_count: 400,
            centroid: Point2::new(cx, cy),
            bbox: BoundingBox {
                min_x: cx as u32 - half,
                min_y: cy as u32 - half,
                max_x: cx as u32 + half,
                max_y: cy as u32 + half,
            },
        }
    }

    #[test]
    fn window_scales_with_body_extent() {
        // span 20, factor 1.6 -> half-extent 32
        let w = SearchWindow::around(&body_at(100.0, 80.0, 10), 1.6);
        assert_eq!(
            w,
            SearchWindow {
                x0: 68,
                y0: 48,
                x1: 132,
                y1: 112
            }
        );
        assert!(!w.exceeds(200, 200));
    }

    #[test]
    fn window_past_the_edge_is_clipped() {
        let w = SearchWindow::around(&body_at(12.0, 12.0, 10), 1.6);
        assert!(w.exceeds(100, 100));
        let clipped = w.clip(100, 100).expect("overlaps frame");
        assert_eq!(clipped.min_x, 0);
        assert_eq!(clipped.min_y, 0);
        assert_eq!(clipped.max_x, 43);
    }

    #[test]
    fn window_outside_the_frame_clips_to_nothing() {
        let w = SearchWindow {
            x0: -40,
            y0: 10,
            x1: -2,
            y1: 20,
        };
        assert_eq!(w.clip(50, 50), None);
    }

    #[test]
    fn finds_marker_next_to_its_body_only() {
        let mut heading = Mask::new(200, 120);
        heading.fill_rect(20, 50, 29, 59); // near slot 0
        heading.fill_rect(170, 100, 179, 109); // far from everything
        let bodies = [Some(body_at(40.0, 55.0, 10)), None];
        let out = search_heading_markers(&heading.view(), &bodies, &HeadingSearchParams::default());
        assert_eq!(out.len(), 2);

        let m = out[0].marker.expect("marker in window");
        assert_eq!(m.pixel_count, 100);
        assert_relative_eq!(m.centroid.x, 24.5);
        assert_relative_eq!(m.centroid.y, 54.5);
        assert!(!out[0].clipped);

        assert_eq!(out[1].window, None);
        assert_eq!(out[1].marker, None);
    }

    #[test]
    fn empty_window_is_not_an_error() {
        let heading = Mask::new(64, 64);
        let bodies = [Some(body_at(3.0, 3.0, 2))];
        let out = search_heading_markers(&heading.view(), &bodies, &HeadingSearchParams::default());
        assert!(out[0].clipped);
        assert_eq!(out[0].marker, None);
    }
}
