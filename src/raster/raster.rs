// src/raster/raster.rs

//! In-memory RGB rasters.

use bytemuck::{Pod, Zeroable};
use log::warn;

use super::grid::Grid;

/// One RGB sample, scaled against the owning raster's denominator.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(level: u16) -> Self {
        Self::new(level, level, level)
    }
}

/// A grid of RGB samples plus the value that represents full intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub pixels: Grid<Rgb>,
    pub denominator: u16,
}

impl Raster {
    pub fn new(pixels: Grid<Rgb>, denominator: u16) -> Self {
        Self { pixels, denominator }
    }

    /// A raster with every sample set to `fill`.
    pub fn filled(width: usize, height: usize, denominator: u16, fill: Rgb) -> Self {
        Self::new(Grid::new(width, height, fill), denominator)
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Drops a trailing odd row and column.
    pub fn crop_even(&self) -> Raster {
        let width = self.width() - self.width() % 2;
        let height = self.height() - self.height() % 2;
        if width != self.width() || height != self.height() {
            warn!(
                "Dropping odd trailing row/column: {}x{} -> {}x{}",
                self.width(),
                self.height(),
                width,
                height
            );
        }
        let mut cropped = Grid::new(width, height, Rgb::default());
        for row in 0..height {
            for col in 0..width {
                cropped[(col, row)] = self.pixels[(col, row)];
            }
        }
        Raster::new(cropped, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_three_packed_channels() {
        assert_eq!(std::mem::size_of::<Rgb>(), 6);
        let samples = [Rgb::new(1, 2, 3), Rgb::gray(9)];
        let channels: &[u16] = bytemuck::cast_slice(&samples);
        assert_eq!(channels, &[1, 2, 3, 9, 9, 9]);
    }

    #[test]
    fn test_crop_even_drops_trailing_edges() {
        let mut raster = Raster::filled(3, 5, 255, Rgb::gray(0));
        raster.pixels[(1, 3)] = Rgb::new(10, 20, 30);
        raster.pixels[(2, 0)] = Rgb::gray(255);

        let cropped = raster.crop_even();
        assert_eq!((cropped.width(), cropped.height()), (2, 4));
        assert_eq!(cropped.denominator, 255);
        assert_eq!(cropped.pixels[(1, 3)], Rgb::new(10, 20, 30));
        assert!(cropped.pixels.as_slice().iter().all(|p| *p != Rgb::gray(255)));
    }

    #[test]
    fn test_crop_even_keeps_even_raster() {
        let raster = Raster::filled(4, 2, 15, Rgb::gray(7));
        assert_eq!(raster.crop_even(), raster);
    }
}
