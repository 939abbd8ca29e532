use robotrack_core::{BoundingBox, Mask, MaskError, MaskView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Bounding rectangle of every foreground pixel in `mask`.
///
/// Rows are scanned for any nonzero value to get the vertical extent, then
/// columns are scanned (within that extent) to get the horizontal extent.
/// The two passes are independent, so with several disjoint blobs the
/// rectangle also covers the background between them; callers re-scan inside
/// it and never treat it as a per-blob bound. Returns `None` for an
/// all-background mask.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width, height = mask.height))
)]
pub fn foreground_roi(mask: &MaskView<'_>) -> Option<BoundingBox> {
    if mask.is_empty() {
        return None;
    }
    foreground_roi_within(mask, BoundingBox::frame(mask.width, mask.height))
}

/// Same as [`foreground_roi`], restricted to `within` (clipped to the mask).
pub fn foreground_roi_within(mask: &MaskView<'_>, within: BoundingBox) -> Option<BoundingBox> {
    if mask.is_empty() {
        return None;
    }
    let within = within.intersect(&BoundingBox::frame(mask.width, mask.height))?;
    let (x0, x1) = (within.min_x as usize, within.max_x as usize);

    let mut rows: Option<(u32, u32)> = None;
    for y in within.min_y..=within.max_y {
        let row = &mask.row(y as usize)[x0..=x1];
        if row.iter().any(|&v| v > 0) {
            rows = Some(match rows {
                None => (y, y),
                Some((lo, _)) => (lo, y),
            });
        }
    }
    let (min_y, max_y) = rows?;

    let mut cols: Option<(u32, u32)> = None;
    for x in x0..=x1 {
        let hit = (min_y..=max_y).any(|y| mask.is_foreground(x, y as usize));
        if hit {
            let x = x as u32;
            cols = Some(match cols {
                None => (x, x),
                Some((lo, _)) => (lo, x),
            });
        }
    }
    let (min_x, max_x) = cols?;

    Some(BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    })
}

/// ROI of the pixel-wise OR of all channel masks.
pub fn combined_roi(masks: &[MaskView<'_>]) -> Result<Option<BoundingBox>, MaskError> {
    let union = Mask::union(masks)?;
    Ok(foreground_roi(&union.view()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_has_no_roi() {
        let m = Mask::new(16, 9);
        assert!(foreground_roi(&m.view()).is_none());
        assert!(foreground_roi(&Mask::new(0, 0).view()).is_none());
    }

    #[test]
    fn single_blob_roi_is_tight() {
        let mut m = Mask::new(40, 30);
        m.fill_rect(10, 5, 14, 8);
        assert_eq!(
            foreground_roi(&m.view()),
            Some(BoundingBox {
                min_x: 10,
                min_y: 5,
                max_x: 14,
                max_y: 8
            })
        );
    }

    #[test]
    fn foreground_on_row_and_column_zero_is_kept() {
        let mut m = Mask::new(8, 8);
        m.set(0, 0, true);
        m.set(7, 7, true);
        assert_eq!(foreground_roi(&m.view()), Some(BoundingBox::frame(8, 8)));
    }

    #[test]
    fn diagonal_blobs_cover_the_gap_between_them() {
        // Two blobs on the main diagonal: the rectangle spans both, including
        // the empty off-diagonal quadrants.
        let mut m = Mask::new(50, 50);
        m.fill_rect(2, 3, 6, 7);
        m.fill_rect(40, 41, 44, 45);
        let roi = foreground_roi(&m.view()).expect("roi");
        assert_eq!(
            roi,
            BoundingBox {
                min_x: 2,
                min_y: 3,
                max_x: 44,
                max_y: 45
            }
        );
        assert!(!m.view().is_foreground(44, 3));
        assert!(!m.view().is_foreground(2, 45));
    }

    #[test]
    fn anti_diagonal_blobs_give_the_same_rectangle() {
        let mut m = Mask::new(50, 50);
        m.fill_rect(40, 3, 44, 7);
        m.fill_rect(2, 41, 6, 45);
        let roi = foreground_roi(&m.view()).expect("roi");
        assert_eq!((roi.min_x, roi.min_y, roi.max_x, roi.max_y), (2, 3, 44, 45));
    }

    #[test]
    fn roi_contains_every_foreground_pixel_of_a_scattered_mask() {
        let mut m = Mask::new(31, 23);
        for (x, y) in [(3, 20), (29, 1), (15, 11), (0, 7), (12, 22)] {
            m.set(x, y, true);
        }
        let roi = foreground_roi(&m.view()).expect("roi");
        let view = m.view();
        for y in 0..view.height {
            for x in 0..view.width {
                if view.is_foreground(x, y) {
                    assert!(roi.contains(x as u32, y as u32), "({x},{y}) outside {roi:?}");
                }
            }
        }
        assert_eq!((roi.min_x, roi.min_y, roi.max_x, roi.max_y), (0, 1, 29, 22));
    }

    #[test]
    fn restricted_scan_ignores_pixels_outside_the_window() {
        let mut m = Mask::new(20, 20);
        m.fill_rect(1, 1, 2, 2);
        m.fill_rect(15, 15, 16, 17);
        let within = BoundingBox {
            min_x: 10,
            min_y: 10,
            max_x: 19,
            max_y: 19,
        };
        assert_eq!(
            foreground_roi_within(&m.view(), within),
            Some(BoundingBox {
                min_x: 15,
                min_y: 15,
                max_x: 16,
                max_y: 17
            })
        );
    }

    #[test]
    fn combined_roi_spans_all_channels() {
        let mut a = Mask::new(20, 20);
        let mut b = Mask::new(20, 20);
        a.fill_rect(2, 2, 3, 3);
        b.fill_rect(10, 12, 11, 13);
        let roi = combined_roi(&[a.view(), b.view()]).expect("same size");
        assert_eq!(
            roi,
            Some(BoundingBox {
                min_x: 2,
                min_y: 2,
                max_x: 11,
                max_y: 13
            })
        );
    }
}
