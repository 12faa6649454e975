//! Column-major pixel grid and the fixed scan order shared by counting and synthesis
//!
//! Cells are addressed as `[column, row]`. Storage is an `Array2` of shape
//! `(width, height)` so that walking the grid in scan order (columns outer,
//! rows inner) walks memory contiguously.

use crate::analysis::color::Color;
use image::RgbImage;
use ndarray::Array2;
use std::ops::Range;

/// Width × height grid of colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    cells: Array2<Color>,
}

impl PixelGrid {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self {
            cells: Array2::from_elem((width, height), fill),
        }
    }

    /// Copy the pixels of a decoded RGB image
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut grid = Self::new(width as usize, height as usize, Color::BLACK);
        for (x, y, pixel) in image.enumerate_pixels() {
            grid.set(x as usize, y as usize, Color::from(*pixel));
        }
        grid
    }

    /// Build an RGB image for encoding
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.get(x as usize, y as usize).unwrap_or_default().into()
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.dim().0
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.dim().1
    }

    /// Color at `(column, row)`, `None` outside the grid
    pub fn get(&self, column: usize, row: usize) -> Option<Color> {
        self.cells.get([column, row]).copied()
    }

    /// Paint `(column, row)`, returning `false` if the cell is outside the grid
    pub fn set(&mut self, column: usize, row: usize, color: Color) -> bool {
        if let Some(cell) = self.cells.get_mut([column, row]) {
            *cell = color;
            true
        } else {
            false
        }
    }

    /// Replace every cell through `map`
    pub fn map_colors<F>(&mut self, map: F)
    where
        F: FnMut(Color) -> Color,
    {
        self.cells.mapv_inplace(map);
    }

    /// Colors in scan order
    pub fn scan(&self) -> impl Iterator<Item = Color> + '_ {
        scan_order(0..self.width(), 0..self.height())
            .filter_map(|[column, row]| self.get(column, row))
    }
}

/// Coordinates `[column, row]` in scan order: columns outer, rows inner
pub fn scan_order(columns: Range<usize>, rows: Range<usize>) -> impl Iterator<Item = [usize; 2]> {
    columns.flat_map(move |column| rows.clone().map(move |row| [column, row]))
}
