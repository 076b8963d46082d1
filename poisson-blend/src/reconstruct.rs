//! Per-channel reconstruction: right-hand side, solve, write-back.
//!
//! Each Interior pixel's equation reads
//!
//! `4 f_p - sum(Interior neighbors) = divergence(p) + sum(Border neighbor values)`
//!
//! The divergence of the guidance field is the negative Laplacian of the
//! source inside the mask; the Border terms carry the Dirichlet boundary
//! condition, taken from the destination image at the pasted location.
//! They sit on the right-hand side because the matrix only has columns
//! for unknowns.

use crate::gradient::GradientField;
use crate::image::LinearRgb;
use crate::matrix::Matrix;
use crate::region::MaskRegion;

/// Solves one color channel and writes it into the destination at the
/// adjusted paste offset.
///
/// Border pixels keep the destination's existing values; only Interior
/// pixels are written, clamped to the [0, 1] linear range. The same
/// `inverse` serves all three channels; only the right-hand side changes.
pub fn reconstruct_channel(
    field: &GradientField,
    region: &MaskRegion,
    inverse: &Matrix,
    dest: &mut LinearRgb,
    offset_x: usize,
    offset_y: usize,
    channel: usize,
) {
    debug_assert_eq!(inverse.n(), region.interior());

    let dx = field.dx().plane(channel);
    let dy = field.dy().plane(channel);
    let dest_plane = dest.plane(channel);

    let mut b = vec![0.0f64; region.interior()];
    region.for_each_interior(|x, y, c| {
        // Interior pixels are never on the crop edge, so every guidance
        // sample below is in bounds.
        let divergence =
            f64::from(dx.get(x - 1, y)) - f64::from(dx.get(x, y)) + f64::from(dy.get(x, y - 1))
                - f64::from(dy.get(x, y));
        let mut rhs = divergence;
        for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            if region.column(nx, ny).is_none() {
                // Border neighbor: fixed value from the destination.
                rhs += f64::from(dest_plane.get(nx + offset_x, ny + offset_y));
            }
        }
        b[c] = rhs;
    });

    let solved = inverse.mul_vec(&b);

    let dest_plane = dest.plane_mut(channel);
    region.for_each_interior(|x, y, c| {
        let value = solved[c].clamp(0.0, 1.0) as f32;
        dest_plane.set(x + offset_x, y + offset_y, value);
    });
}
