//! Discrete Poisson system assembly.
//!
//! One row per Interior pixel, the five-point Laplacian restricted to the
//! unknowns: 4 on the diagonal, -1 for each Interior neighbor. Border
//! neighbors are known quantities and contribute to the right-hand side
//! during reconstruction, not to the matrix. The matrix depends only on
//! the mask's classification, never on image content, which is what makes
//! its inverse reusable across channels and images.

use crate::matrix::Matrix;
use crate::region::MaskRegion;

/// Builds the coefficient matrix for a reduced mask.
#[must_use]
pub fn assemble(region: &MaskRegion) -> Matrix {
    let mut matrix = Matrix::zeros(region.interior());

    region.for_each_interior(|x, y, c| {
        matrix.set(c, c, 4.0);
        // Interior pixels never sit on the crop edge, so all four
        // neighbors are in bounds.
        let neighbors = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)];
        for (nx, ny) in neighbors {
            if let Some(nc) = region.column(nx, ny) {
                matrix.set(c, nc, -1.0);
            }
        }
    });

    matrix
}
