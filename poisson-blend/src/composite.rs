//! Baseline paste routines, for comparison against the Poisson blend.
//!
//! Neither routine touches the solver. `naive_paste` shows the seam the
//! blend removes; `naive_gradient_paste` shows what gradient matching
//! alone does without the boundary-value solve.

use crate::gradient::GradientField;
use crate::image::{LinearRgb, Plane};

/// Direct masked copy of the source into the destination, no blending.
///
/// Pixels whose pasted location falls outside the destination are
/// skipped.
pub fn naive_paste(
    source: &LinearRgb,
    mask: &Plane,
    dest: &mut LinearRgb,
    offset_x: i64,
    offset_y: i64,
) {
    let (w, h) = (source.width(), source.height());
    for c in 0..3 {
        let src = source.plane(c);
        for y in 0..h {
            let dy = y as i64 + offset_y;
            if dy < 0 || dy >= dest.height() as i64 {
                continue;
            }
            let mask_row = mask.row(y);
            for x in 0..w {
                let dx = x as i64 + offset_x;
                if dx < 0 || dx >= dest.width() as i64 {
                    continue;
                }
                if mask_row[x] != 0.0 {
                    let v = src.get(x, y);
                    dest.plane_mut(c).set(dx as usize, dy as usize, v);
                }
            }
        }
    }
}

/// Row-wise running sum of the source's gradient field, re-seeded from
/// the destination at each run's first masked pixel.
///
/// Within a horizontal run of masked pixels the pasted values reproduce
/// the source's horizontal gradients exactly, but each row integrates
/// independently, so rows drift apart; that drift is what the full
/// Poisson solve eliminates.
pub fn naive_gradient_paste(
    source: &LinearRgb,
    mask: &Plane,
    dest: &mut LinearRgb,
    offset_x: i64,
    offset_y: i64,
) {
    let field = GradientField::build(source, mask);
    let (w, h) = (source.width(), source.height());

    for c in 0..3 {
        let dx_plane = field.dx().plane(c);
        for y in 0..h {
            let dy = y as i64 + offset_y;
            if dy < 0 || dy >= dest.height() as i64 {
                continue;
            }
            let dy = dy as usize;
            let mask_row = mask.row(y);
            let mut value = 0.0f32;
            for x in 0..w {
                if mask_row[x] == 0.0 {
                    continue;
                }
                let dx = x as i64 + offset_x;
                let visible = (0..dest.width() as i64).contains(&dx);
                if x == 0 || mask_row[x - 1] == 0.0 {
                    // Run start: seed from the destination boundary value.
                    value = if visible {
                        dest.plane(c).get(dx as usize, dy)
                    } else {
                        0.0
                    };
                } else {
                    // Integrate even when clipped so the run stays in sync.
                    value += dx_plane.get(x - 1, y);
                }
                if visible {
                    dest.plane_mut(c).set(dx as usize, dy, value.clamp(0.0, 1.0));
                }
            }
        }
    }
}
