/// Borrowed binary mask, row-major, foreground iff value > 0.
#[derive(Clone, Copy, Debug)]
pub struct MaskView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned binary mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("invalid mask buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
    #[error("mask dimensions differ ({width}x{height}, expected {expected_width}x{expected_height})")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },
    #[error("cannot combine an empty list of masks")]
    NoMasks,
}

impl<'a> MaskView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, MaskError> {
        let view = Self {
            width,
            height,
            data,
        };
        view.check_buffer()?;
        Ok(view)
    }

    /// Buffer length must be `width * height`; views built from the public
    /// fields skip [`MaskView::new`] and are checked here.
    pub fn check_buffer(&self) -> Result<(), MaskError> {
        let expected = self.width.saturating_mul(self.height);
        if self.data.len() != expected {
            return Err(MaskError::InvalidBuffer {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    /// Foreground test for an in-bounds pixel.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] > 0
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn same_size(&self, other: &MaskView<'_>) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }
}

impl Mask {
    /// All-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, MaskError> {
        MaskView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> MaskView<'_> {
        MaskView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { 255 } else { 0 };
    }

    /// Pixel-wise OR of equally sized masks.
    pub fn union(masks: &[MaskView<'_>]) -> Result<Self, MaskError> {
        let Some(first) = masks.first() else {
            return Err(MaskError::NoMasks);
        };
        let mut out = Mask::new(first.width, first.height);
        for m in masks {
            m.check_buffer()?;
            if !m.same_size(first) {
                return Err(MaskError::SizeMismatch {
                    width: m.width,
                    height: m.height,
                    expected_width: first.width,
                    expected_height: first.height,
                });
            }
            for (dst, &src) in out.data.iter_mut().zip(m.data) {
                *dst |= src;
            }
        }
        Ok(out)
    }

    /// Paint the inclusive rectangle `[x0, x1] x [y0, y1]`, clipped to the mask.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x1 = x1.min(self.width - 1);
        let y1 = y1.min(self.height - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, true);
            }
        }
    }

    /// Paint a filled disk, clipped to the mask. Returns the number of pixels set.
    pub fn fill_disk(&mut self, cx: i64, cy: i64, radius: i64) -> usize {
        let mut painted = 0;
        let r2 = radius * radius;
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r2 {
                    let idx = y as usize * self.width + x as usize;
                    if self.data[idx] == 0 {
                        painted += 1;
                    }
                    self.data[idx] = 255;
                }
            }
        }
        painted
    }
}
