// src/codec/quantize.rs

//! Scalar quantizers for the block coefficients.
//!
//! The average coefficient covers the whole luma range and is mapped to
//! 0..=63 with a base of 63, so both ends of [0, 1] are exactly reachable.
//! Detail coefficients are small; anything beyond +/-0.3 saturates, leaving
//! codes in -15..=15 that fit a 6-bit signed field with room to spare.

/// Largest average code.
pub const AVERAGE_MAX: u8 = 63;

/// Largest detail code magnitude.
pub const DETAIL_MAX: i8 = 15;

/// Magnitude at which detail coefficients saturate.
pub const DETAIL_LIMIT: f32 = 0.3;

/// Codes per unit of detail coefficient.
pub const DETAIL_SCALE: f32 = 50.0;

/// Maps an average in [0, 1] to 0..=63. Out-of-range input is clamped.
pub fn quantize_average(a: f32) -> u8 {
    let level = (a * f32::from(AVERAGE_MAX)).round();
    level.clamp(0.0, f32::from(AVERAGE_MAX)) as u8
}

pub fn dequantize_average(q: u8) -> f32 {
    f32::from(q) / f32::from(AVERAGE_MAX)
}

/// Maps a detail coefficient to -15..=15.
pub fn quantize_detail(x: f32) -> i8 {
    if x <= -DETAIL_LIMIT {
        -DETAIL_MAX
    } else if x >= DETAIL_LIMIT {
        DETAIL_MAX
    } else {
        // |x| < 0.3 keeps the product within +/-15
        (x * DETAIL_SCALE).round() as i8
    }
}

pub fn dequantize_detail(q: i8) -> f32 {
    f32::from(q) / DETAIL_SCALE
}
