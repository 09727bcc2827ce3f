// src/raster/grid.rs

//! Fixed-size two-dimensional storage.
//!
//! A [`Grid`] holds `width * height` cells in row-major order. It offers two
//! traversals: plain row-major over every cell, and block-major over the
//! complete 2x2 blocks (a trailing odd row or column is never part of a block).

use std::ops::{Index, IndexMut};

use crate::utils::error::{CodecError, Result};

/// Offsets of the four samples of a 2x2 block, in sample order.
pub const BLOCK_OFFSETS: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Allocates a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wraps row-major `cells` as a `width` x `height` grid.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(CodecError::InvalidArg(format!(
                "{} cells cannot form a {}x{} grid",
                cells.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of complete 2x2 blocks along each axis.
    pub fn block_dimensions(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    #[inline]
    fn offset(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.offset(col, row).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.offset(col, row).map(move |i| &mut self.cells[i])
    }

    /// Overwrites one cell. Panics when (`col`, `row`) is outside the grid.
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        self[(col, row)] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    /// Visits every cell as `(col, row, cell)`, rows top to bottom.
    pub fn iter_row_major(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    /// Writes the four samples of block (`block_col`, `block_row`).
    pub fn set_block_2x2(&mut self, block_col: usize, block_row: usize, samples: [T; 4]) {
        for ((dc, dr), sample) in BLOCK_OFFSETS.into_iter().zip(samples) {
            self[(block_col * 2 + dc, block_row * 2 + dr)] = sample;
        }
    }
}

impl<T: Copy> Grid<T> {
    /// The four samples of block (`block_col`, `block_row`) in sample order.
    pub fn block_2x2(&self, block_col: usize, block_row: usize) -> [T; 4] {
        BLOCK_OFFSETS.map(|(dc, dr)| self[(block_col * 2 + dc, block_row * 2 + dr)])
    }

    /// Visits every complete 2x2 block as `(block_col, block_row, samples)`,
    /// block rows top to bottom.
    pub fn blocks_2x2(&self) -> impl Iterator<Item = (usize, usize, [T; 4])> + '_ {
        let (blocks_wide, blocks_high) = self.block_dimensions();
        (0..blocks_high).flat_map(move |br| {
            (0..blocks_wide).map(move |bc| (bc, br, self.block_2x2(bc, br)))
        })
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (col, row): (usize, usize)) -> &T {
        match self.offset(col, row) {
            Some(i) => &self.cells[i],
            None => panic!(
                "grid index ({}, {}) out of bounds for {}x{}",
                col, row, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut T {
        match self.offset(col, row) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "grid index ({}, {}) out of bounds for {}x{}",
                col, row, self.width, self.height
            ),
        }
    }
}
