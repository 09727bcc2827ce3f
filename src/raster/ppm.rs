// src/raster/ppm.rs

//! Reading source images and writing decoded rasters as binary PPM.
//!
//! Any format the `image` crate recognises can be read. Sources with 8-bit
//! channels become rasters with denominator 255; deeper sources become
//! rasters with denominator 65535.

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use log::debug;
use std::io::{Cursor, Read, Write};

use super::grid::Grid;
use super::raster::{Raster, Rgb};
use crate::utils::error::Result;

const MAXVAL: u16 = u8::MAX as u16;

/// Reads an entire image from `reader`.
pub fn read_raster<R: Read>(mut reader: R) -> Result<Raster> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    read_raster_from_bytes(&bytes)
}

pub fn read_raster_from_bytes(bytes: &[u8]) -> Result<Raster> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    raster_from_image(&image)
}

/// Converts a decoded image into a raster, keeping 16-bit precision when the
/// source has it.
pub fn raster_from_image(image: &DynamicImage) -> Result<Raster> {
    let color = image.color();
    let deep = color.bytes_per_pixel() / color.channel_count() > 1;
    let (width, height) = (image.width() as usize, image.height() as usize);

    debug!("Read {}x{} image ({:?})", width, height, color);

    if deep {
        let rgb = image.to_rgb16();
        let cells = rgb
            .pixels()
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
            .collect();
        Ok(Raster::new(Grid::from_vec(width, height, cells)?, u16::MAX))
    } else {
        let rgb = image.to_rgb8();
        let cells = rgb
            .pixels()
            .map(|p| Rgb::new(p.0[0].into(), p.0[1].into(), p.0[2].into()))
            .collect();
        Ok(Raster::new(Grid::from_vec(width, height, cells)?, MAXVAL))
    }
}

/// Writes `raster` as a binary PPM (P6) with maxval 255.
///
/// Rasters with another denominator are rescaled, truncating.
pub fn write_ppm<W: Write>(raster: &Raster, writer: W) -> Result<()> {
    let encoder = PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
    let (width, height) = (raster.width() as u32, raster.height() as u32);
    let channels = bytemuck::cast_slice::<Rgb, u16>(raster.pixels.as_slice());

    let bytes: Vec<u8> = if raster.denominator == MAXVAL {
        channels.iter().map(|&v| v.min(MAXVAL) as u8).collect()
    } else {
        let denominator = u32::from(raster.denominator.max(1));
        channels
            .iter()
            .map(|&v| (u32::from(v).min(denominator) * u32::from(MAXVAL) / denominator) as u8)
            .collect()
    };
    encoder.write_image(&bytes, width, height, ExtendedColorType::Rgb8)?;

    debug!("Wrote {}x{} PPM", width, height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_8bit() {
        let mut raster = Raster::filled(3, 2, 255, Rgb::gray(0));
        raster.pixels[(2, 1)] = Rgb::new(255, 128, 1);

        let mut buf = Vec::new();
        write_ppm(&raster, &mut buf).unwrap();
        assert!(buf.starts_with(b"P6"));

        let back = read_raster_from_bytes(&buf).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_reads_ascii_ppm() {
        let source = b"P3\n2 1\n255\n255 0 0  0 0 255\n";
        let raster = read_raster_from_bytes(source).unwrap();
        assert_eq!(raster.denominator, 255);
        assert_eq!(raster.pixels[(0, 0)], Rgb::new(255, 0, 0));
        assert_eq!(raster.pixels[(1, 0)], Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_other_denominators_are_rescaled() {
        let raster = Raster::filled(1, 1, 1000, Rgb::new(1000, 500, 0));
        let mut buf = Vec::new();
        write_ppm(&raster, &mut buf).unwrap();

        let back = read_raster_from_bytes(&buf).unwrap();
        assert_eq!(back.denominator, 255);
        assert_eq!(back.pixels[(0, 0)], Rgb::new(255, 127, 0));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(read_raster_from_bytes(b"definitely not an image").is_err());
    }
}
