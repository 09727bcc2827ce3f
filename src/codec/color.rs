// src/codec/color.rs

//! RGB <-> Y/Pb/Pr conversion (ITU-R BT.601 coefficients).
//!
//! Colors are handled as normalized triples in [0, 1]; scaling to and from a
//! raster's integer samples goes through [`normalize`] and [`denormalize`].

use crate::raster::raster::Rgb;

/// A normalized `[red, green, blue]` triple.
pub type Rgb01 = [f32; 3];

// Forward matrix, rows produce Y, Pb, Pr.
const RGB_TO_YPBPR: [[f32; 3]; 3] = [
    [0.299, 0.587, 0.114],
    [-0.168736, -0.331264, 0.5],
    [0.5, -0.418688, -0.081312],
];

// Inverse matrix, rows produce R, G, B from (Y, Pb, Pr).
const YPBPR_TO_RGB: [[f32; 3]; 3] = [
    [1.0, 0.0, 1.402],
    [1.0, -0.344136, -0.714136],
    [1.0, 1.772, 0.0],
];

/// Luma and the two color-difference channels of one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LumaChroma {
    pub y: f32,
    pub pb: f32,
    pub pr: f32,
}

#[inline]
fn apply(matrix: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    matrix.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
}

/// Divides each channel by `denominator`.
pub fn normalize(pixel: Rgb, denominator: u16) -> Rgb01 {
    let denom = f32::from(denominator);
    [
        f32::from(pixel.red) / denom,
        f32::from(pixel.green) / denom,
        f32::from(pixel.blue) / denom,
    ]
}

pub fn to_luma_chroma(rgb: Rgb01) -> LumaChroma {
    let [y, pb, pr] = apply(&RGB_TO_YPBPR, rgb);
    LumaChroma { y, pb, pr }
}

pub fn to_rgb(lc: LumaChroma) -> Rgb01 {
    apply(&YPBPR_TO_RGB, [lc.y, lc.pb, lc.pr])
}

/// Clamps each channel into [0, 1].
pub fn clamp01(rgb: Rgb01) -> Rgb01 {
    rgb.map(|c| c.clamp(0.0, 1.0))
}

/// Scales each channel by `denominator`, truncating toward zero.
pub fn denormalize(rgb: Rgb01, denominator: u16) -> Rgb {
    let denom = f32::from(denominator);
    let [r, g, b] = rgb.map(|c| (c * denom) as u16);
    Rgb::new(r, g, b)
}
