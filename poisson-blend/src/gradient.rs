//! Guidance field: forward-difference gradients of the masked source.
//!
//! The solve reproduces these gradients inside the mask. Samples outside
//! the mask and in the last row/column carry zero gradient, so the field
//! can be read without bounds branches during reconstruction.

use crate::image::{LinearRgb, Plane};

/// Per-channel forward differences of the cropped source.
#[derive(Debug, Clone)]
pub struct GradientField {
    dx: LinearRgb,
    dy: LinearRgb,
}

impl GradientField {
    /// Computes the guidance field for a cropped source and mask of equal
    /// size.
    ///
    /// For every masked pixel outside the last row/column, per channel:
    /// `dx = source(x+1, y) - source(x, y)` and
    /// `dy = source(x, y+1) - source(x, y)`.
    ///
    /// # Panics
    /// Panics if source and mask dimensions differ; callers crop both with
    /// the same bounds first.
    #[must_use]
    pub fn build(source: &LinearRgb, mask: &Plane) -> Self {
        assert!(source.plane(0).same_size(mask));
        let (w, h) = (source.width(), source.height());
        let mut dx = LinearRgb::new(w, h);
        let mut dy = LinearRgb::new(w, h);

        for c in 0..3 {
            let src = source.plane(c);
            for y in 0..h {
                let row = src.row(y);
                let mask_row = mask.row(y);
                for x in 0..w {
                    if mask_row[x] == 0.0 {
                        continue;
                    }
                    if x + 1 < w {
                        dx.plane_mut(c).set(x, y, row[x + 1] - row[x]);
                    }
                    if y + 1 < h {
                        dy.plane_mut(c).set(x, y, src.get(x, y + 1) - row[x]);
                    }
                }
            }
        }

        Self { dx, dy }
    }

    /// Horizontal differences, one plane per channel.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> &LinearRgb {
        &self.dx
    }

    /// Vertical differences, one plane per channel.
    #[inline]
    #[must_use]
    pub fn dy(&self) -> &LinearRgb {
        &self.dy
    }
}
