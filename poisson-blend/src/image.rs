//! Planar floating-point pixel buffers.
//!
//! All intermediate computation works on single-channel `f32` planes in
//! linear light. Three-channel images are three independent planes, which
//! keeps per-channel loops simple and lets the reconstruction step treat
//! each color channel as a separate solve.

/// Single-channel floating point image, row-major, width-packed.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Plane {
    /// Creates a plane filled with zeros.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Creates a plane from existing samples.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    #[must_use]
    pub fn from_vec(data: Vec<f32>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates a plane filled with a constant value.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Plane width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns a row as a slice.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Returns a row as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Gets a sample.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Sets a sample.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    /// Fills the whole plane with a constant value.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Checks whether two planes have the same dimensions.
    #[must_use]
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Copies a rectangular window into a new plane (row-wise copy).
    ///
    /// # Panics
    /// Panics if the window does not lie inside the plane.
    #[must_use]
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> Self {
        assert!(x0 + width <= self.width && y0 + height <= self.height);
        let mut out = Self::new(width, height);
        for y in 0..height {
            let src = &self.row(y0 + y)[x0..x0 + width];
            out.row_mut(y).copy_from_slice(src);
        }
        out
    }

    /// Raw samples, row-major.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Three-channel linear-light RGB image stored as separate planes.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRgb {
    planes: [Plane; 3],
}

impl LinearRgb {
    /// Creates a zero-filled image.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            planes: [
                Plane::new(width, height),
                Plane::new(width, height),
                Plane::new(width, height),
            ],
        }
    }

    /// Assembles an image from three equally sized planes.
    ///
    /// # Panics
    /// Panics if the planes differ in size.
    #[must_use]
    pub fn from_planes(r: Plane, g: Plane, b: Plane) -> Self {
        assert!(r.same_size(&g) && r.same_size(&b));
        Self { planes: [r, g, b] }
    }

    /// Image width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    /// Image height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Borrows one channel plane.
    #[inline]
    #[must_use]
    pub fn plane(&self, channel: usize) -> &Plane {
        &self.planes[channel]
    }

    /// Mutably borrows one channel plane.
    #[inline]
    pub fn plane_mut(&mut self, channel: usize) -> &mut Plane {
        &mut self.planes[channel]
    }

    /// Crops all three channels to the same window.
    #[must_use]
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> Self {
        Self {
            planes: [
                self.planes[0].crop(x0, y0, width, height),
                self.planes[1].crop(x0, y0, width, height),
                self.planes[2].crop(x0, y0, width, height),
            ],
        }
    }
}
