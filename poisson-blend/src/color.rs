//! Gamma 2.2 color conversion between 8-bit storage and linear light.
//!
//! The blend solves in linear light: gradients of gamma-encoded values do
//! not add like physical light, and seams reappear if the solve runs on
//! encoded samples. Storage uses the plain power-law model
//! `linear = (v / 255)^2.2`, matching the decode the solver was designed
//! against (not the piecewise sRGB curve).

use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::image::{LinearRgb, Plane};

/// Storage gamma exponent.
pub const GAMMA: f32 = 2.2;

/// Pre-computed 8-bit gamma decode table (256 entries).
static DECODE_LUT: std::sync::LazyLock<[f32; 256]> = std::sync::LazyLock::new(|| {
    let mut lut = [0.0f32; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = (i as f32 / 255.0).powf(GAMMA);
    }
    lut
});

/// Converts a stored 8-bit sample to linear light.
#[inline]
#[must_use]
pub fn decode(v: u8) -> f32 {
    DECODE_LUT[v as usize]
}

/// Converts a linear-light sample to a stored 8-bit sample.
///
/// Out-of-range input is clamped before encoding.
#[inline]
#[must_use]
pub fn encode(linear: f32) -> u8 {
    let v = linear.clamp(0.0, 1.0).powf(1.0 / GAMMA);
    (v * 255.0).round() as u8
}

/// Decodes an 8-bit RGB image into planar linear light.
#[must_use]
pub fn decode_rgb(img: ImgRef<'_, RGB8>) -> LinearRgb {
    let (width, height) = (img.width(), img.height());
    let mut out = LinearRgb::new(width, height);
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            out.plane_mut(0).set(x, y, decode(px.r));
            out.plane_mut(1).set(x, y, decode(px.g));
            out.plane_mut(2).set(x, y, decode(px.b));
        }
    }
    out
}

/// Encodes planar linear light back into an 8-bit RGB image.
#[must_use]
pub fn encode_rgb(img: &LinearRgb) -> ImgVec<RGB8> {
    let (width, height) = (img.width(), img.height());
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let r = img.plane(0).row(y);
        let g = img.plane(1).row(y);
        let b = img.plane(2).row(y);
        for x in 0..width {
            pixels.push(RGB8::new(encode(r[x]), encode(g[x]), encode(b[x])));
        }
    }
    ImgVec::new(pixels, width, height)
}

/// Decodes a single-channel 8-bit mask into a plane.
///
/// Any nonzero byte selects the pixel; the plane keeps 1.0 / 0.0 so the
/// classification stage only tests for nonzero.
#[must_use]
pub fn decode_mask(img: ImgRef<'_, u8>) -> Plane {
    let (width, height) = (img.width(), img.height());
    let mut out = Plane::new(width, height);
    for (y, row) in img.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v != 0 {
                out.set(x, y, 1.0);
            }
        }
    }
    out
}
