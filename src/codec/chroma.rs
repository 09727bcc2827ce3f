// src/codec/chroma.rs

//! Fixed 16-level quantization table for averaged Pb/Pr values.
//!
//! Levels are denser near zero, where most natural chroma sits.

/// Number of chroma levels; each index fits in 4 bits.
pub const CHROMA_LEVELS: usize = 16;

const CHROMA_TABLE: [f32; CHROMA_LEVELS] = [
    -0.35, -0.20, -0.15, -0.10, -0.077, -0.055, -0.033, -0.011,
    0.011, 0.033, 0.055, 0.077, 0.10, 0.15, 0.20, 0.35,
];

/// Index of the table entry nearest `chroma`.
///
/// Values beyond either end map to the end index. A tie between two entries
/// resolves to the lower index, and NaN maps to the negative entry nearest
/// zero.
pub fn index_of_chroma(chroma: f32) -> u8 {
    if chroma.is_nan() {
        return (CHROMA_LEVELS / 2 - 1) as u8;
    }
    // first entry not below chroma
    let upper = CHROMA_TABLE.partition_point(|&level| level < chroma);
    let index = match upper {
        0 => 0,
        CHROMA_LEVELS => CHROMA_LEVELS - 1,
        i => {
            if CHROMA_TABLE[i] - chroma < chroma - CHROMA_TABLE[i - 1] {
                i
            } else {
                i - 1
            }
        }
    };
    index as u8
}

/// Chroma value of table entry `index`. Panics if `index` is not a table index.
pub fn chroma_of_index(index: u8) -> f32 {
    CHROMA_TABLE[usize::from(index)]
}
