//! Mask reduction: bounding box, pixel classification, and the dense
//! column index map.
//!
//! The solve only ever looks at the mask's bounding box, so everything
//! downstream works on a cropped copy. Within the crop every pixel is
//! classified once:
//!
//! - `Excluded`: outside the mask, never touched.
//! - `Border`: in the mask but on the crop edge or next to an excluded
//!   pixel; holds a fixed (Dirichlet) value.
//! - `Interior`: in the mask with all four neighbors in the mask; one
//!   unknown of the linear system.
//!
//! Interior pixels get dense column indices in raster order; everything
//! else maps to the `UNSOLVED` sentinel. A flat array indexed by raster
//! position replaces any keyed lookup, sized once here.

use crate::image::Plane;
use crate::BlendError;

/// Sentinel column index for pixels that are not solved for.
pub const UNSOLVED: u32 = u32::MAX;

/// Classification of a pixel within the cropped mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Outside the mask.
    Excluded,
    /// In the mask, adjacent to the mask edge or the crop edge; fixed value.
    Border,
    /// In the mask, fully surrounded by mask pixels; solved for.
    Interior,
}

/// Tightest rectangle containing every nonzero mask sample.
///
/// Origin is inclusive, extent is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Left edge (inclusive).
    pub x0: usize,
    /// Top edge (inclusive).
    pub y0: usize,
    /// Width of the box.
    pub width: usize,
    /// Height of the box.
    pub height: usize,
}

impl Bounds {
    /// Scans a mask once and returns the tightest box around its nonzero
    /// samples, or `None` for an empty mask.
    #[must_use]
    pub fn find(mask: &Plane) -> Option<Self> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        let mut any = false;

        for y in 0..mask.height() {
            let row = mask.row(y);
            for (x, &v) in row.iter().enumerate() {
                if v != 0.0 {
                    any = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        any.then(|| Self {
            x0: min_x,
            y0: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }
}

/// Cropped mask with per-pixel classification and the dense index map.
#[derive(Debug, Clone)]
pub struct MaskRegion {
    mask: Plane,
    bounds: Bounds,
    index: Vec<u32>,
    interior: usize,
    border: usize,
}

impl MaskRegion {
    /// Reduces a full-size mask to its bounding box and classifies every
    /// pixel inside the crop.
    ///
    /// # Errors
    /// Returns [`BlendError::EmptyMask`] when the mask has no nonzero
    /// sample.
    pub fn reduce(mask: &Plane) -> Result<Self, BlendError> {
        let bounds = Bounds::find(mask).ok_or(BlendError::EmptyMask)?;
        let cropped = mask.crop(bounds.x0, bounds.y0, bounds.width, bounds.height);

        let (w, h) = (cropped.width(), cropped.height());
        let mut index = vec![UNSOLVED; w * h];
        let mut interior = 0usize;
        let mut border = 0usize;

        for y in 0..h {
            for x in 0..w {
                if cropped.get(x, y) == 0.0 {
                    continue;
                }
                let on_edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let touches_excluded = !on_edge
                    && (cropped.get(x - 1, y) == 0.0
                        || cropped.get(x + 1, y) == 0.0
                        || cropped.get(x, y - 1) == 0.0
                        || cropped.get(x, y + 1) == 0.0);
                if on_edge || touches_excluded {
                    border += 1;
                } else {
                    index[y * w + x] = interior as u32;
                    interior += 1;
                }
            }
        }

        Ok(Self {
            mask: cropped,
            bounds,
            index,
            interior,
            border,
        })
    }

    /// The cropped mask plane.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> &Plane {
        &self.mask
    }

    /// Bounding box of the mask in full-image coordinates.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Crop width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.mask.width()
    }

    /// Crop height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.mask.height()
    }

    /// Number of Interior pixels (unknowns of the linear system).
    #[inline]
    #[must_use]
    pub fn interior(&self) -> usize {
        self.interior
    }

    /// Number of Border pixels.
    #[inline]
    #[must_use]
    pub fn border(&self) -> usize {
        self.border
    }

    /// Dense column index of an Interior pixel, or `None` otherwise.
    #[inline]
    #[must_use]
    pub fn column(&self, x: usize, y: usize) -> Option<usize> {
        let c = self.index[y * self.mask.width() + x];
        (c != UNSOLVED).then_some(c as usize)
    }

    /// Classification of a pixel inside the crop.
    #[must_use]
    pub fn class(&self, x: usize, y: usize) -> PixelClass {
        if self.mask.get(x, y) == 0.0 {
            PixelClass::Excluded
        } else if self.index[y * self.mask.width() + x] != UNSOLVED {
            PixelClass::Interior
        } else {
            PixelClass::Border
        }
    }

    /// Visits every Interior pixel in raster order with its column index.
    pub fn for_each_interior(&self, mut f: impl FnMut(usize, usize, usize)) {
        let w = self.mask.width();
        for y in 0..self.mask.height() {
            for x in 0..w {
                let c = self.index[y * w + x];
                if c != UNSOLVED {
                    f(x, y, c as usize);
                }
            }
        }
    }
}
