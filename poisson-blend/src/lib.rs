//! # Poisson image blending
//!
//! Gradient-domain compositing: a masked region of a source image is
//! pasted into a destination so that the pasted pixels reproduce the
//! source's color gradients while the boundary matches the destination,
//! removing the seam a direct copy leaves.
//!
//! The pipeline: the mask is reduced to its bounding box and every pixel
//! classified Interior, Border or Excluded; forward-difference gradients
//! of the masked source form the guidance field; the five-point discrete
//! Laplacian over the Interior pixels is assembled as a dense matrix and
//! inverted by Gauss-Jordan elimination; each color channel is then
//! solved with a matrix-vector product and written back.
//!
//! Inverting the matrix is the dominant cost (O(n³) for n interior
//! pixels). [`BlendOperator`] computes it once per mask and reuses it for
//! all three channels and for any number of source/destination pairs that
//! share the mask.
//!
//! ## Example
//!
//! ```rust
//! use poisson_blend::{poisson_blend, Img, RGB8};
//!
//! // 8x8 images; the mask selects the center 4x4 block.
//! let source = Img::new(vec![RGB8::new(200, 60, 60); 64], 8, 8);
//! let dest = Img::new(vec![RGB8::new(40, 40, 180); 64], 8, 8);
//! let mut mask = vec![0u8; 64];
//! for y in 2..6 {
//!     for x in 2..6 {
//!         mask[y * 8 + x] = 255;
//!     }
//! }
//! let mask = Img::new(mask, 8, 8);
//!
//! let out = poisson_blend(source.as_ref(), mask.as_ref(), dest.as_ref(), 0, 0).unwrap();
//! assert_eq!(out.width(), 8);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod color;
pub mod composite;
pub mod gradient;
pub mod image;
pub mod laplacian;
pub mod matrix;
pub mod reconstruct;
pub mod region;

pub use crate::image::{LinearRgb, Plane};
pub use crate::region::{Bounds, MaskRegion, PixelClass};

// Re-export imgref and rgb types used at the API boundary.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::RGB8;

use crate::gradient::GradientField;
use crate::matrix::Matrix;

/// Error type for blend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlendError {
    /// Source and mask dimensions differ.
    DimensionMismatch {
        /// Source image width.
        source_width: usize,
        /// Source image height.
        source_height: usize,
        /// Mask width.
        mask_width: usize,
        /// Mask height.
        mask_height: usize,
    },
    /// The mask contains no nonzero sample.
    EmptyMask,
    /// Gauss-Jordan elimination found no usable pivot.
    SingularMatrix {
        /// Column at which elimination failed.
        column: usize,
    },
    /// The pasted mask region does not lie inside the destination.
    RegionOutOfBounds {
        /// Requested paste x offset.
        paste_x: i64,
        /// Requested paste y offset.
        paste_y: i64,
        /// Width of the mask's bounding box.
        region_width: usize,
        /// Height of the mask's bounding box.
        region_height: usize,
        /// Destination width.
        dest_width: usize,
        /// Destination height.
        dest_height: usize,
    },
}

impl std::fmt::Display for BlendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch {
                source_width,
                source_height,
                mask_width,
                mask_height,
            } => write!(
                f,
                "source/mask dimension mismatch: {source_width}x{source_height} vs {mask_width}x{mask_height}"
            ),
            Self::EmptyMask => write!(f, "mask contains no nonzero samples"),
            Self::SingularMatrix { column } => {
                write!(f, "coefficient matrix is singular at column {column}")
            }
            Self::RegionOutOfBounds {
                paste_x,
                paste_y,
                region_width,
                region_height,
                dest_width,
                dest_height,
            } => write!(
                f,
                "pasted region {region_width}x{region_height} at ({paste_x}, {paste_y}) \
                 does not fit in destination {dest_width}x{dest_height}"
            ),
        }
    }
}

impl std::error::Error for BlendError {}

/// Precomputed blend operator for one mask.
///
/// Construction runs mask reduction, system assembly and matrix
/// inversion. The operator can then blend any number of source and
/// destination pairs sharing that mask: the inverse is content
/// independent, so only the per-channel right-hand sides are rebuilt.
/// Cache invalidation is the caller's concern; an operator is only valid
/// for the exact mask it was built from.
#[derive(Debug, Clone)]
pub struct BlendOperator {
    region: MaskRegion,
    inverse: Matrix,
    mask_width: usize,
    mask_height: usize,
}

impl BlendOperator {
    /// Builds the operator from an 8-bit single-channel mask.
    ///
    /// Any nonzero byte selects the pixel.
    ///
    /// # Errors
    /// Returns [`BlendError::EmptyMask`] for an all-zero mask and
    /// [`BlendError::SingularMatrix`] if the assembled system cannot be
    /// inverted.
    pub fn new(mask: ImgRef<'_, u8>) -> Result<Self, BlendError> {
        Self::from_plane(&color::decode_mask(mask))
    }

    /// Builds the operator from a mask plane (nonzero samples select).
    ///
    /// # Errors
    /// Same failure modes as [`BlendOperator::new`].
    pub fn from_plane(mask: &Plane) -> Result<Self, BlendError> {
        let region = MaskRegion::reduce(mask)?;
        let inverse = laplacian::assemble(&region).invert()?;
        Ok(Self {
            region,
            inverse,
            mask_width: mask.width(),
            mask_height: mask.height(),
        })
    }

    /// Number of Interior pixels (system unknowns).
    #[must_use]
    pub fn interior(&self) -> usize {
        self.region.interior()
    }

    /// Number of Border pixels.
    #[must_use]
    pub fn border(&self) -> usize {
        self.region.border()
    }

    /// Bounding box of the mask in full-mask coordinates.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.region.bounds()
    }

    /// Blends an 8-bit source into an 8-bit destination, returning the
    /// blended image.
    ///
    /// Decodes both images to linear light, blends, and re-encodes.
    ///
    /// # Errors
    /// Returns [`BlendError::DimensionMismatch`] if the source does not
    /// match the operator's mask dimensions, or
    /// [`BlendError::RegionOutOfBounds`] if the pasted region does not
    /// fit in the destination.
    pub fn blend(
        &self,
        source: ImgRef<'_, RGB8>,
        dest: ImgRef<'_, RGB8>,
        paste_x: i64,
        paste_y: i64,
    ) -> Result<ImgVec<RGB8>, BlendError> {
        let source_linear = color::decode_rgb(source);
        let mut dest_linear = color::decode_rgb(dest);
        self.blend_linear(&source_linear, &mut dest_linear, paste_x, paste_y)?;
        Ok(color::encode_rgb(&dest_linear))
    }

    /// Blends a linear-light source into a linear-light destination in
    /// place.
    ///
    /// # Errors
    /// Same failure modes as [`BlendOperator::blend`].
    pub fn blend_linear(
        &self,
        source: &LinearRgb,
        dest: &mut LinearRgb,
        paste_x: i64,
        paste_y: i64,
    ) -> Result<(), BlendError> {
        if source.width() != self.mask_width || source.height() != self.mask_height {
            return Err(BlendError::DimensionMismatch {
                source_width: source.width(),
                source_height: source.height(),
                mask_width: self.mask_width,
                mask_height: self.mask_height,
            });
        }

        let bounds = self.region.bounds();
        let (offset_x, offset_y) = self.adjusted_offset(paste_x, paste_y, dest)?;

        let cropped = source.crop(bounds.x0, bounds.y0, bounds.width, bounds.height);
        let field = GradientField::build(&cropped, self.region.mask());

        for channel in 0..3 {
            reconstruct::reconstruct_channel(
                &field,
                &self.region,
                &self.inverse,
                dest,
                offset_x,
                offset_y,
                channel,
            );
        }
        Ok(())
    }

    /// Adds the bounding-box origin to the paste offset and checks that
    /// the region lands inside the destination.
    fn adjusted_offset(
        &self,
        paste_x: i64,
        paste_y: i64,
        dest: &LinearRgb,
    ) -> Result<(usize, usize), BlendError> {
        let bounds = self.region.bounds();
        let out_of_bounds = || BlendError::RegionOutOfBounds {
            paste_x,
            paste_y,
            region_width: bounds.width,
            region_height: bounds.height,
            dest_width: dest.width(),
            dest_height: dest.height(),
        };

        let ox = paste_x + bounds.x0 as i64;
        let oy = paste_y + bounds.y0 as i64;
        if ox < 0 || oy < 0 {
            return Err(out_of_bounds());
        }
        let (ox, oy) = (ox as usize, oy as usize);
        if ox + bounds.width > dest.width() || oy + bounds.height > dest.height() {
            return Err(out_of_bounds());
        }
        Ok((ox, oy))
    }
}

/// One-shot Poisson blend of 8-bit images.
///
/// Builds a [`BlendOperator`] for the mask and applies it once. Use the
/// operator directly to amortize the inversion over repeated blends.
///
/// # Errors
/// Returns [`BlendError::DimensionMismatch`] when source and mask
/// dimensions differ, plus any [`BlendOperator`] failure mode.
pub fn poisson_blend(
    source: ImgRef<'_, RGB8>,
    mask: ImgRef<'_, u8>,
    dest: ImgRef<'_, RGB8>,
    paste_x: i64,
    paste_y: i64,
) -> Result<ImgVec<RGB8>, BlendError> {
    if source.width() != mask.width() || source.height() != mask.height() {
        return Err(BlendError::DimensionMismatch {
            source_width: source.width(),
            source_height: source.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }
    BlendOperator::new(mask)?.blend(source, dest, paste_x, paste_y)
}

/// One-shot Poisson blend of planar linear-light images, in place.
///
/// # Errors
/// Same failure modes as [`poisson_blend`].
pub fn poisson_blend_linear(
    source: &LinearRgb,
    mask: &Plane,
    dest: &mut LinearRgb,
    paste_x: i64,
    paste_y: i64,
) -> Result<(), BlendError> {
    BlendOperator::from_plane(mask)?.blend_linear(source, dest, paste_x, paste_y)
}
