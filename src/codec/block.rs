// src/codec/block.rs

//! One 2x2 pixel block <-> one packed 32-bit word.
//!
//! Word layout, most significant field first:
//!
//! | field | bits  | content                         |
//! |-------|-------|---------------------------------|
//! | a     | 31-26 | average luma, unsigned          |
//! | b     | 25-20 | vertical detail, signed         |
//! | c     | 19-14 | horizontal detail, signed       |
//! | d     | 13-8  | diagonal detail, signed         |
//! | pb    | 7-4   | averaged Pb table index         |
//! | pr    | 3-0   | averaged Pr table index         |

use crate::bitpack::{Field, Overflow, Word};
use crate::raster::raster::Rgb;
use crate::utils::error::Result;

use super::chroma::{chroma_of_index, index_of_chroma};
use super::color::{self, LumaChroma};
use super::dct::{self, Coefficients};
use super::quantize::{dequantize_average, dequantize_detail, quantize_average, quantize_detail};

pub const A_FIELD: Field = Field::new(6, 26);
pub const B_FIELD: Field = Field::new(6, 20);
pub const C_FIELD: Field = Field::new(6, 14);
pub const D_FIELD: Field = Field::new(6, 8);
pub const PB_FIELD: Field = Field::new(4, 4);
pub const PR_FIELD: Field = Field::new(4, 0);

/// Denominator of every decoded raster.
pub const DECODED_DENOMINATOR: u16 = 255;

/// The six quantized values stored in a packed block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantizedBlock {
    pub a: u8,
    pub b: i8,
    pub c: i8,
    pub d: i8,
    pub pb: u8,
    pub pr: u8,
}

impl QuantizedBlock {
    /// Packs the fields in order a, b, c, d, pb, pr.
    pub fn pack(&self) -> std::result::Result<u32, Overflow> {
        let mut word: Word = 0;
        word = A_FIELD.set_unsigned(word, self.a.into())?;
        word = B_FIELD.set_signed(word, self.b.into())?;
        word = C_FIELD.set_signed(word, self.c.into())?;
        word = D_FIELD.set_signed(word, self.d.into())?;
        word = PB_FIELD.set_unsigned(word, self.pb.into())?;
        word = PR_FIELD.set_unsigned(word, self.pr.into())?;
        // every field ends at or below bit 31
        Ok(word as u32)
    }

    pub fn unpack(word: u32) -> Self {
        let word = Word::from(word);
        // field widths bound every value to its narrow type
        Self {
            a: A_FIELD.get_unsigned(word) as u8,
            b: B_FIELD.get_signed(word) as i8,
            c: C_FIELD.get_signed(word) as i8,
            d: D_FIELD.get_signed(word) as i8,
            pb: PB_FIELD.get_unsigned(word) as u8,
            pr: PR_FIELD.get_unsigned(word) as u8,
        }
    }
}

/// Runs the four samples of a block through color conversion, the 2x2
/// transform and quantization.
pub fn quantize_block(pixels: [Rgb; 4], denominator: u16) -> QuantizedBlock {
    let mut luma = [0.0f32; 4];
    let mut pb_sum = 0.0f32;
    let mut pr_sum = 0.0f32;

    for (y, pixel) in luma.iter_mut().zip(pixels) {
        let lc = color::to_luma_chroma(color::normalize(pixel, denominator));
        *y = lc.y;
        pb_sum += lc.pb;
        pr_sum += lc.pr;
    }

    let coeffs = dct::forward(luma);
    QuantizedBlock {
        a: quantize_average(coeffs.a),
        b: quantize_detail(coeffs.b),
        c: quantize_detail(coeffs.c),
        d: quantize_detail(coeffs.d),
        pb: index_of_chroma(pb_sum / 4.0),
        pr: index_of_chroma(pr_sum / 4.0),
    }
}

/// Encodes one block. An overflow here means a quantizer produced a code
/// wider than its field.
pub fn encode_block(pixels: [Rgb; 4], denominator: u16) -> Result<u32> {
    let quantized = quantize_block(pixels, denominator);
    let word = quantized.pack()?;

    #[cfg(feature = "debug-logging")]
    log::trace!("block {:?} -> {:?} -> {:#010x}", pixels, quantized, word);

    Ok(word)
}

/// Reconstructs the four samples of a block, scaled to [`DECODED_DENOMINATOR`].
pub fn decode_block(word: u32) -> [Rgb; 4] {
    let q = QuantizedBlock::unpack(word);
    let luma = dct::inverse(Coefficients {
        a: dequantize_average(q.a),
        b: dequantize_detail(q.b),
        c: dequantize_detail(q.c),
        d: dequantize_detail(q.d),
    });
    let pb = chroma_of_index(q.pb);
    let pr = chroma_of_index(q.pr);

    #[cfg(feature = "debug-logging")]
    log::trace!("{:#010x} -> {:?}", word, q);

    luma.map(|y| {
        let rgb = color::clamp01(color::to_rgb(LumaChroma { y, pb, pr }));
        color::denormalize(rgb, DECODED_DENOMINATOR)
    })
}
