use crate::io::configuration::MONOCHROME_THRESHOLD;
use bitvec::prelude::*;
use image::{DynamicImage, GrayImage};

/// Binary tone of a monochrome pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Luma below the threshold
    Black,
    /// Luma at or above the threshold
    White,
}

/// Monochrome footprint of a source image
///
/// Stores one bit per cell (set = white) in column-major order to match the
/// scan order. The minority tone is fixed at construction: white when white
/// cells make up at most half of the image, black otherwise.
#[derive(Clone, Debug)]
pub struct SilhouetteMask {
    white: BitVec,
    width: usize,
    height: usize,
    minority: Tone,
}

impl SilhouetteMask {
    /// Threshold the image's luma without dithering
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_luma(&image.to_luma8())
    }

    /// Threshold an 8-bit luma image without dithering
    pub fn from_luma(luma: &GrayImage) -> Self {
        let (width, height) = luma.dimensions();
        Self::from_fn(width as usize, height as usize, |column, row| {
            let value = luma
                .get_pixel_checked(column as u32, row as u32)
                .map_or(0, |pixel| pixel.0[0]);
            if value >= MONOCHROME_THRESHOLD {
                Tone::White
            } else {
                Tone::Black
            }
        })
    }

    /// Build a mask from a per-cell tone function of `(column, row)`
    pub fn from_fn<F>(width: usize, height: usize, mut tone_at: F) -> Self
    where
        F: FnMut(usize, usize) -> Tone,
    {
        let white: BitVec = (0..width)
            .flat_map(|column| (0..height).map(move |row| (column, row)))
            .map(|(column, row)| tone_at(column, row) == Tone::White)
            .collect();

        let white_count = white.count_ones();
        let minority = if white_count * 2 <= width * height {
            Tone::White
        } else {
            Tone::Black
        };

        Self {
            white,
            width,
            height,
            minority,
        }
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Tone occupying fewer cells (white on a tie)
    pub const fn minority(&self) -> Tone {
        self.minority
    }

    /// Count of white cells
    pub fn white_count(&self) -> usize {
        self.white.count_ones()
    }

    /// Tone at `(column, row)`, `None` outside the mask
    pub fn tone(&self, column: usize, row: usize) -> Option<Tone> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.white
            .get(column * self.height + row)
            .map(|bit| if *bit { Tone::White } else { Tone::Black })
    }

    /// Whether synthesis must paint `(column, row)` pure white
    pub fn is_forced_white(&self, column: usize, row: usize) -> bool {
        self.tone(column, row) == Some(self.minority)
    }
}
