//! # Arith Codec
//!
//! A lossy block transform codec for RGB images. Every 2x2 pixel block is
//! reduced to one 32-bit word: an average luma, three detail coefficients
//! of a 2x2 orthogonal transform, and one averaged Pb/Pr pair drawn from a
//! 16-level table.
//!
//! This library is organized into several modules:
//! - `bitpack`: arbitrary-width bit fields inside a 64-bit word
//! - `utils`: error handling and the logging backend
//! - `raster`: pixel grids and image file I/O
//! - `codec`: color conversion, block transform, quantization, the per-block
//!   codec and the stream format

// Re-export commonly used types at the crate root
pub use utils::error::{CodecError, Result};

pub mod bitpack;

pub mod utils {
    pub mod error;
    pub mod log;
}

pub mod raster {
    pub mod grid;
    pub mod ppm;
    #[allow(clippy::module_inception)]
    pub mod raster;

    pub use grid::Grid;
    pub use raster::{Raster, Rgb};
}

pub mod codec {
    pub mod block;
    pub mod chroma;
    pub mod color;
    pub mod dct;
    pub mod quantize;
    pub mod stream;

    pub use block::{QuantizedBlock, decode_block, encode_block};
    pub use stream::{FORMAT_TAG, decode, decode_from, encode, encode_to};
}

// Public API exports
pub use codec::{decode, decode_from, encode, encode_to};
pub use raster::{Grid, Raster, Rgb};

use std::io::{BufReader, Read, Write};

/// Compresses an image read from `input` (PPM or any other format the
/// `image` crate decodes) and writes the compressed stream to `output`.
pub fn compress<R: Read, W: Write>(input: R, output: W) -> Result<()> {
    let raster = raster::ppm::read_raster(input)?;
    encode_to(&raster, output)
}

/// Decompresses a stream read from `input` and writes it to `output` as a
/// binary PPM.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let raster = decode_from(BufReader::new(input))?;
    raster::ppm::write_ppm(&raster, &mut output)?;
    output.flush()?;
    Ok(())
}
