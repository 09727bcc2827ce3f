// src/codec/dct.rs

//! Orthogonal 2x2 transform over the four luma samples of a block.
//!
//! Samples are indexed `row_parity * 2 + col_parity`: top-left, top-right,
//! bottom-left, bottom-right.

/// Average and three detail coefficients of one block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coefficients {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

pub fn forward(y: [f32; 4]) -> Coefficients {
    let [y0, y1, y2, y3] = y;
    Coefficients {
        a: (y3 + y2 + y1 + y0) / 4.0,
        b: (y3 + y2 - y1 - y0) / 4.0,
        c: (y3 - y2 + y1 - y0) / 4.0,
        d: (y3 - y2 - y1 + y0) / 4.0,
    }
}

pub fn inverse(coeffs: Coefficients) -> [f32; 4] {
    let Coefficients { a, b, c, d } = coeffs;
    [
        a - b - c + d,
        a - b + c - d,
        a + b - c - d,
        a + b + c + d,
    ]
}
