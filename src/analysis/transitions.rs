//! Transition counting and the normalized first-order color model

use crate::analysis::color::Color;
use crate::analysis::quantization::quantize;
use crate::io::configuration::{MAX_PALETTE_COLORS, PROBABILITY_TOLERANCE};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::grid::{PixelGrid, scan_order};
use image::RgbImage;
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw `current -> next` observation counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionCounts {
    counts: BTreeMap<Color, BTreeMap<Color, usize>>,
}

impl TransitionCounts {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one step of the chain
    pub fn observe(&mut self, current: Color, next: Color) {
        *self
            .counts
            .entry(current)
            .or_default()
            .entry(next)
            .or_insert(0) += 1;
    }

    /// Number of times `next` followed `current`
    pub fn count(&self, current: Color, next: Color) -> usize {
        self.counts
            .get(&current)
            .and_then(|row| row.get(&next))
            .copied()
            .unwrap_or(0)
    }

    /// Total observations across all rows
    pub fn total(&self) -> usize {
        self.counts.values().flat_map(BTreeMap::values).sum()
    }

    /// Divide every row by its own total
    pub fn normalize(&self) -> TransitionTable {
        let rows = self
            .counts
            .iter()
            .map(|(&current, row)| {
                let total = row.values().sum::<usize>() as f64;
                let probabilities = row
                    .iter()
                    .map(|(&next, &count)| (next, count as f64 / total))
                    .collect();
                (current, probabilities)
            })
            .collect();

        TransitionTable { rows }
    }
}

/// Row-normalized probability of each color following each source color
///
/// Rows and destinations enumerate in canonical key order. The set of source
/// colors is the alphabet available to synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransitionTable {
    rows: BTreeMap<Color, BTreeMap<Color, f64>>,
}

impl TransitionTable {
    /// Build a table from explicit probability rows
    ///
    /// Rows are taken as given apart from validation; sums that drift from 1.0
    /// are tolerated and absorbed at sampling time.
    ///
    /// # Errors
    ///
    /// Returns an error if any probability is negative or not finite
    pub fn from_rows(rows: BTreeMap<Color, BTreeMap<Color, f64>>) -> Result<Self> {
        for (source, row) in &rows {
            for (destination, &probability) in row {
                if !probability.is_finite() || probability < 0.0 {
                    return Err(AlgorithmError::InvalidSourceData {
                        reason: format!(
                            "probability {source} -> {destination} is {probability}, expected a finite value >= 0"
                        ),
                    });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Build a table from `#rrggbb` keyed rows
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a valid color or a probability is invalid
    pub fn from_hex_rows(rows: &[(&str, &[(&str, f64)])]) -> Result<Self> {
        let mut parsed = BTreeMap::new();
        for &(source, destinations) in rows {
            let row: &mut BTreeMap<Color, f64> =
                parsed.entry(Color::from_hex(source)?).or_default();
            for &(destination, probability) in destinations {
                row.insert(Color::from_hex(destination)?, probability);
            }
        }
        Self::from_rows(parsed)
    }

    /// Decode a table previously written by [`TransitionTable::to_json`]
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a key is not `#rrggbb`, or a
    /// probability is invalid
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: BTreeMap<Color, BTreeMap<Color, f64>> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Encode the table as pretty-printed JSON keyed by `#rrggbb`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Source colors in key order
    pub fn alphabet(&self) -> Vec<Color> {
        self.rows.keys().copied().collect()
    }

    /// Test whether `color` is a source key
    pub fn contains(&self, color: Color) -> bool {
        self.rows.contains_key(&color)
    }

    /// Destination probabilities for `color`
    pub fn row(&self, color: Color) -> Option<&BTreeMap<Color, f64>> {
        self.rows.get(&color)
    }

    /// Probability of `next` following `current`, zero when unobserved
    pub fn probability(&self, current: Color, next: Color) -> f64 {
        self.row(current)
            .and_then(|row| row.get(&next))
            .copied()
            .unwrap_or(0.0)
    }

    /// All rows in key order
    pub fn rows(&self) -> impl Iterator<Item = (Color, &BTreeMap<Color, f64>)> {
        self.rows.iter().map(|(&color, row)| (color, row))
    }

    /// Number of source colors
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Test if no transitions were recorded
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Test that every non-empty row sums to one within tolerance
    pub fn is_normalized(&self) -> bool {
        self.rows.values().all(|row| {
            row.is_empty() || (row.values().sum::<f64>() - 1.0).abs() <= PROBABILITY_TOLERANCE
        })
    }
}

/// Tally transitions along the scan order of an already quantized grid
///
/// The seed is the pixel at `(0, 0)`; counted positions cover columns
/// `1..width` and rows `1..height`. Positions in column 0 or row 0 never act as
/// their own observation.
pub fn count_transitions(grid: &PixelGrid) -> TransitionCounts {
    let mut counts = TransitionCounts::new();
    let Some(mut current) = grid.get(0, 0) else {
        return counts;
    };

    for [column, row] in scan_order(1..grid.width(), 1..grid.height()) {
        if let Some(next) = grid.get(column, row) {
            counts.observe(current, next);
            current = next;
        }
    }

    counts
}

/// Quantizes source images and derives their transition tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelBuilder {
    max_colors: usize,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            max_colors: MAX_PALETTE_COLORS,
        }
    }
}

impl ModelBuilder {
    /// Create a builder with a custom palette bound
    ///
    /// # Errors
    ///
    /// Returns an error if `max_colors` is zero or exceeds [`MAX_PALETTE_COLORS`]
    pub fn new(max_colors: usize) -> Result<Self> {
        if max_colors == 0 || max_colors > MAX_PALETTE_COLORS {
            return Err(invalid_parameter(
                "max_colors",
                &max_colors,
                &format!("must be between 1 and {MAX_PALETTE_COLORS}"),
            ));
        }
        Ok(Self { max_colors })
    }

    /// Palette bound applied before counting
    pub const fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// Quantize the grid, then count and normalize its transitions
    ///
    /// # Errors
    ///
    /// Returns an error if quantization rejects the palette bound
    pub fn build_from_grid(&self, grid: &PixelGrid) -> Result<TransitionTable> {
        let (quantized, palette) = quantize(grid, self.max_colors)?;
        let counts = count_transitions(&quantized);
        let table = counts.normalize();

        log::debug!(
            "quantized {}x{} image to {} colors, {} transitions over {} source colors",
            grid.width(),
            grid.height(),
            palette.len(),
            counts.total(),
            table.len()
        );

        Ok(table)
    }

    /// Build the transition table of a decoded RGB image
    ///
    /// # Errors
    ///
    /// Returns an error if quantization rejects the palette bound
    pub fn build(&self, image: &RgbImage) -> Result<TransitionTable> {
        self.build_from_grid(&PixelGrid::from_rgb_image(image))
    }
}

/// Build the transition table of a decoded RGB image with the default palette bound
///
/// # Errors
///
/// Returns an error if quantization fails
pub fn build_model(image: &RgbImage) -> Result<TransitionTable> {
    ModelBuilder::default().build(image)
}
