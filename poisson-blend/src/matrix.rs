//! Dense matrix storage and Gauss-Jordan inversion.
//!
//! Inversion is the dominant cost of the pipeline (O(n³) time, O(n²)
//! memory for n interior pixels), which is exactly why the inverse is
//! computed once per mask and reused for every channel and every image
//! pair sharing that mask. Elimination runs in `f64`; pixel data stays
//! `f32` everywhere else.

use crate::BlendError;

/// Pivot magnitudes at or below this count as zero.
const PIVOT_EPSILON: f64 = 1e-12;

/// Dense square matrix, row-major `f64` storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates an n x n zero matrix.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Creates an n x n identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Matrix dimension.
    #[inline]
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Reads one entry.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Writes one entry.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Dense matrix-vector product.
    ///
    /// # Panics
    /// Panics if `v.len() != n`.
    #[must_use]
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.n);
        let mut out = vec![0.0; self.n];
        for (row, slot) in out.iter_mut().enumerate() {
            let r = &self.data[row * self.n..(row + 1) * self.n];
            *slot = r.iter().zip(v).map(|(a, b)| a * b).sum();
        }
        out
    }

    /// Dense matrix-matrix product (test support for round-trip checks).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.n, other.n);
        let n = self.n;
        let mut out = Self::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out.data[i * n + j] += a * other.get(k, j);
                }
            }
        }
        out
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.n;
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..lo * n + n].swap_with_slice(&mut tail[..n]);
    }

    /// Inverts the matrix by Gauss-Jordan elimination on the augmented
    /// [A | I] pair.
    ///
    /// Columns are processed left to right: find a usable pivot at or
    /// below the diagonal, swap it into place, scale the pivot row to 1,
    /// then eliminate the column from every other row. Both halves of the
    /// augmented pair receive every row operation; the right half ends up
    /// as the inverse.
    ///
    /// # Errors
    /// Returns [`BlendError::SingularMatrix`] when no usable pivot exists
    /// for some column.
    pub fn invert(&self) -> Result<Self, BlendError> {
        let n = self.n;
        let mut a = self.clone();
        let mut inv = Self::identity(n);

        for col in 0..n {
            // Pivot search: first row at or below the diagonal with a
            // usable entry in this column.
            let pivot_row = (col..n)
                .find(|&r| a.get(r, col).abs() > PIVOT_EPSILON)
                .ok_or(BlendError::SingularMatrix { column: col })?;

            a.swap_rows(col, pivot_row);
            inv.swap_rows(col, pivot_row);

            let pivot = a.get(col, col);
            let scale = 1.0 / pivot;
            for j in 0..n {
                a.data[col * n + j] *= scale;
                inv.data[col * n + j] *= scale;
            }
            a.data[col * n + col] = 1.0;

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a.get(row, col);
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    let av = a.get(col, j);
                    let iv = inv.get(col, j);
                    a.data[row * n + j] -= factor * av;
                    inv.data[row * n + j] -= factor * iv;
                }
            }
        }

        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_identity_error(m: &Matrix) -> f64 {
        let n = m.n();
        let mut err: f64 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let expect = if i == j { 1.0 } else { 0.0 };
                err = err.max((m.get(i, j) - expect).abs());
            }
        }
        err
    }

    #[test]
    fn test_identity_inverts_to_itself() {
        let m = Matrix::identity(4);
        let inv = m.invert().unwrap();
        assert!(max_identity_error(&inv) < 1e-12);
    }

    #[test]
    fn test_known_2x2_inverse() {
        let mut m = Matrix::zeros(2);
        m.set(0, 0, 4.0);
        m.set(0, 1, 7.0);
        m.set(1, 0, 2.0);
        m.set(1, 1, 6.0);
        let inv = m.invert().unwrap();
        assert!((inv.get(0, 0) - 0.6).abs() < 1e-12);
        assert!((inv.get(0, 1) + 0.7).abs() < 1e-12);
        assert!((inv.get(1, 0) + 0.2).abs() < 1e-12);
        assert!((inv.get(1, 1) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_pivot_requires_row_swap() {
        // Leading zero forces the pivot search below the diagonal.
        let mut m = Matrix::zeros(2);
        m.set(0, 1, 1.0);
        m.set(1, 0, 1.0);
        let inv = m.invert().unwrap();
        let round = m.mul(&inv);
        assert!(max_identity_error(&round) < 1e-12);
    }

    #[test]
    fn test_singular_matrix_detected() {
        let mut m = Matrix::zeros(3);
        // Two identical rows.
        for j in 0..3 {
            m.set(0, j, 1.0 + j as f64);
            m.set(1, j, 1.0 + j as f64);
            m.set(2, j, j as f64);
        }
        match m.invert() {
            Err(BlendError::SingularMatrix { .. }) => {}
            other => panic!("expected SingularMatrix, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_laplacian_like() {
        // Diagonally dominant system resembling the blend's Laplacian.
        let n = 6;
        let mut m = Matrix::zeros(n);
        for i in 0..n {
            m.set(i, i, 4.0);
            if i > 0 {
                m.set(i, i - 1, -1.0);
            }
            if i + 1 < n {
                m.set(i, i + 1, -1.0);
            }
        }
        let inv = m.invert().unwrap();
        let round = m.mul(&inv);
        assert!(max_identity_error(&round) < 1e-10);
    }

    #[test]
    fn test_mul_vec() {
        let mut m = Matrix::zeros(2);
        m.set(0, 0, 1.0);
        m.set(0, 1, 2.0);
        m.set(1, 0, 3.0);
        m.set(1, 1, 4.0);
        let v = m.mul_vec(&[1.0, 1.0]);
        assert_eq!(v, vec![3.0, 7.0]);
    }
}
