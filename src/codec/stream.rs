// src/codec/stream.rs

//! Whole-image encoding and the compressed stream format.
//!
//! ```text
//! COMP40 Compressed image format 2\n
//! <packed_width> <packed_height>\n
//! <packed_width * packed_height words, 4 bytes each, big-endian, row-major>
//! ```
//!
//! The decoder also accepts a single space in place of the first `\n`.
//!
//! The packed grid is half the (even-cropped) source in each direction; each
//! word is one 2x2 block as laid out in [`super::block`].

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info, warn};
use std::io::{self, BufRead, Read, Write};

use super::block::{DECODED_DENOMINATOR, decode_block, encode_block};
use crate::raster::grid::Grid;
use crate::raster::raster::{Raster, Rgb};
use crate::utils::error::{CodecError, Result};

/// First line of every compressed stream.
pub const FORMAT_TAG: &str = "COMP40 Compressed image format 2";

// Longest dimension line worth reading: two u64 values, a space and '\n'.
const MAX_DIMENSION_LINE: u64 = 2 * 20 + 2;

// Cap on up-front allocation; larger grids grow as words actually arrive.
const MAX_PREALLOCATED_WORDS: usize = 1 << 20;

/// Packs every complete 2x2 block of `raster` into a word grid of half its
/// size. An odd trailing row or column is ignored.
pub fn encode_raster(raster: &Raster) -> Result<Grid<u32>> {
    if raster.denominator == 0 {
        return Err(CodecError::InvalidArg("raster denominator is zero".into()));
    }
    let (blocks_wide, blocks_high) = raster.pixels.block_dimensions();
    if blocks_wide == 0 || blocks_high == 0 {
        return Err(CodecError::InvalidArg(format!(
            "{}x{} image has no complete 2x2 block",
            raster.width(),
            raster.height()
        )));
    }
    if raster.width() % 2 != 0 || raster.height() % 2 != 0 {
        warn!(
            "Ignoring odd trailing row/column of {}x{} image",
            raster.width(),
            raster.height()
        );
    }

    let words = encode_blocks(raster)?;
    info!(
        "Encoded {}x{} image into {}x{} blocks",
        raster.width(),
        raster.height(),
        blocks_wide,
        blocks_high
    );
    Grid::from_vec(blocks_wide, blocks_high, words)
}

#[cfg(not(feature = "rayon"))]
fn encode_blocks(raster: &Raster) -> Result<Vec<u32>> {
    raster
        .pixels
        .blocks_2x2()
        .map(|(_, _, pixels)| encode_block(pixels, raster.denominator))
        .collect()
}

#[cfg(feature = "rayon")]
fn encode_blocks(raster: &Raster) -> Result<Vec<u32>> {
    use rayon::prelude::*;

    let (blocks_wide, blocks_high) = raster.pixels.block_dimensions();
    (0..blocks_wide * blocks_high)
        .into_par_iter()
        .map(|i| {
            let pixels = raster.pixels.block_2x2(i % blocks_wide, i / blocks_wide);
            encode_block(pixels, raster.denominator)
        })
        .collect()
}

/// Expands a packed grid into a raster twice its size with denominator 255.
pub fn decode_packed(packed: &Grid<u32>) -> Raster {
    let mut pixels = Grid::new(packed.width() * 2, packed.height() * 2, Rgb::default());
    scatter_blocks(packed, &mut pixels);
    debug!(
        "Decoded {}x{} blocks into {}x{} image",
        packed.width(),
        packed.height(),
        pixels.width(),
        pixels.height()
    );
    Raster::new(pixels, DECODED_DENOMINATOR)
}

#[cfg(not(feature = "rayon"))]
fn scatter_blocks(packed: &Grid<u32>, pixels: &mut Grid<Rgb>) {
    for (block_col, block_row, &word) in packed.iter_row_major() {
        pixels.set_block_2x2(block_col, block_row, decode_block(word));
    }
}

#[cfg(feature = "rayon")]
fn scatter_blocks(packed: &Grid<u32>, pixels: &mut Grid<Rgb>) {
    use rayon::prelude::*;

    let blocks: Vec<[Rgb; 4]> = packed
        .as_slice()
        .par_iter()
        .map(|&word| decode_block(word))
        .collect();
    let blocks_wide = packed.width();
    for (i, block) in blocks.into_iter().enumerate() {
        pixels.set_block_2x2(i % blocks_wide, i / blocks_wide, block);
    }
}

/// Writes the header and every word of `packed`, row-major, big-endian.
pub fn write_packed<W: Write>(packed: &Grid<u32>, mut writer: W) -> Result<()> {
    write!(writer, "{}\n{} {}\n", FORMAT_TAG, packed.width(), packed.height())?;
    for (_, _, &word) in packed.iter_row_major() {
        writer.write_u32::<BigEndian>(word)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads one `\n`-terminated line of at most `limit` bytes, without the
/// terminator.
fn read_header_line<R: BufRead>(reader: &mut R, limit: u64, what: &str) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    reader.by_ref().take(limit).read_until(b'\n', &mut line)?;
    if line.pop() != Some(b'\n') {
        return Err(CodecError::MalformedHeader(format!(
            "{} line is missing or not terminated by a newline",
            what
        )));
    }
    Ok(line)
}

fn parse_dimension(field: &[u8]) -> Result<u64> {
    let valid = !field.is_empty() && field.iter().all(u8::is_ascii_digit);
    std::str::from_utf8(field)
        .ok()
        .filter(|_| valid)
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| {
            CodecError::MalformedHeader(format!(
                "invalid dimension {:?}",
                String::from_utf8_lossy(field)
            ))
        })
}

/// Parses the header and returns the packed grid dimensions.
///
/// The tag may be followed by either `\n` (as written by [`write_packed`]) or
/// a single space, so `<tag> <w> <h>\n` is accepted too.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut tag = Vec::new();
    reader
        .by_ref()
        .take(FORMAT_TAG.len() as u64 + 1)
        .read_to_end(&mut tag)?;
    let separator = tag.pop();
    if tag != FORMAT_TAG.as_bytes() || !matches!(separator, Some(b' ' | b'\n')) {
        tag.extend(separator);
        return Err(CodecError::MalformedHeader(format!(
            "unrecognised format tag {:?}",
            String::from_utf8_lossy(&tag)
        )));
    }

    let line = read_header_line(reader, MAX_DIMENSION_LINE, "dimension")?;
    let mut fields = line.split(|&b| b == b' ');
    let (Some(width), Some(height), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(CodecError::MalformedHeader(format!(
            "expected \"<width> <height>\", found {:?}",
            String::from_utf8_lossy(&line)
        )));
    };
    let (width, height) = (parse_dimension(width)?, parse_dimension(height)?);
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }

    // the decoded raster is twice as large in each direction
    let fits = |v: u64| usize::try_from(v).ok().filter(|v| v.checked_mul(2).is_some());
    match (fits(width), fits(height)) {
        (Some(w), Some(h)) if w.checked_mul(h).is_some() => {
            debug!("Header declares {}x{} blocks", w, h);
            Ok((w, h))
        }
        _ => Err(CodecError::MalformedHeader(format!(
            "dimensions {}x{} are too large",
            width, height
        ))),
    }
}

/// Reads a complete compressed stream into its packed grid.
///
/// Running out of input before the last byte of the last word is an error;
/// bytes after the last word are ignored.
pub fn read_packed<R: BufRead>(reader: &mut R) -> Result<Grid<u32>> {
    let (width, height) = read_header(reader)?;
    let expected = width * height;

    let mut words = Vec::with_capacity(expected.min(MAX_PREALLOCATED_WORDS));
    while words.len() < expected {
        match reader.read_u32::<BigEndian>() {
            Ok(word) => words.push(word),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(CodecError::TruncatedStream {
                    expected,
                    read: words.len(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !reader.fill_buf()?.is_empty() {
        debug!("Ignoring trailing bytes after {} words", expected);
    }
    Grid::from_vec(width, height, words)
}

/// Encodes `raster` into a complete compressed stream.
pub fn encode_to<W: Write>(raster: &Raster, writer: W) -> Result<()> {
    let packed = encode_raster(raster)?;
    write_packed(&packed, writer)
}

pub fn encode(raster: &Raster) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(raster, &mut out)?;
    Ok(out)
}

/// Decodes a complete compressed stream read from `reader`.
pub fn decode_from<R: BufRead>(mut reader: R) -> Result<Raster> {
    let packed = read_packed(&mut reader)?;
    Ok(decode_packed(&packed))
}

pub fn decode(mut bytes: &[u8]) -> Result<Raster> {
    decode_from(&mut bytes)
}
