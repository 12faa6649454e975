//! Median-cut palette reduction
//!
//! Distinct colors are weighted by pixel count and grouped into boxes. The
//! most populous splittable box is repeatedly cut at the weighted median of its
//! widest channel until the palette bound is reached. Each box contributes its
//! count-weighted mean color.

use crate::analysis::color::Color;
use crate::io::configuration::MAX_PALETTE_COLORS;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::PixelGrid;
use std::collections::{BTreeMap, HashMap};

/// Reduced set of representative colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Representative colors, sorted and distinct
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of colors in the palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Test if the palette holds no colors
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Closest palette color by squared RGB distance
    ///
    /// Ties resolve to the earlier palette entry. Returns the input unchanged
    /// for an empty palette.
    pub fn nearest(&self, color: Color) -> Color {
        self.colors
            .iter()
            .copied()
            .min_by_key(|candidate| candidate.distance_squared(color))
            .unwrap_or(color)
    }
}

/// Group of distinct colors awaiting a split
struct ColorBox {
    entries: Vec<(Color, usize)>,
    population: usize,
}

impl ColorBox {
    fn new(entries: Vec<(Color, usize)>) -> Self {
        let population = entries.iter().map(|&(_, count)| count).sum();
        Self {
            entries,
            population,
        }
    }

    fn is_splittable(&self) -> bool {
        self.entries.len() > 1
    }

    /// Channel with the largest value range and that range
    fn widest_channel(&self) -> (usize, u8) {
        (0..3)
            .map(|channel| {
                let values = self
                    .entries
                    .iter()
                    .filter_map(|(color, _)| color.0.get(channel).copied());
                let (low, high) = values.fold((u8::MAX, u8::MIN), |(low, high), value| {
                    (low.min(value), high.max(value))
                });
                (channel, high.saturating_sub(low))
            })
            .max_by_key(|&(channel, range)| (range, std::cmp::Reverse(channel)))
            .unwrap_or((0, 0))
    }

    /// Cut at the weighted median of the widest channel
    fn split(mut self) -> (Self, Self) {
        let (channel, _) = self.widest_channel();
        self.entries
            .sort_unstable_by_key(|(color, _)| (color.0.get(channel).copied(), *color));

        let half = self.population.div_ceil(2);
        let mut running = 0;
        let mut cut = self.entries.len();
        for (index, &(_, count)) in self.entries.iter().enumerate() {
            running += count;
            if running >= half {
                cut = index + 1;
                break;
            }
        }
        // Both halves must keep at least one color
        let cut = cut.clamp(1, self.entries.len() - 1);

        let upper = self.entries.split_off(cut);
        (Self::new(self.entries), Self::new(upper))
    }

    fn mean_color(&self) -> Color {
        let mut sums = [0u64; 3];
        for &(color, count) in &self.entries {
            for (sum, &value) in sums.iter_mut().zip(color.0.iter()) {
                *sum += u64::from(value) * count as u64;
            }
        }
        let total = self.population.max(1) as u64;
        let [r, g, b] = sums.map(|sum| ((sum + total / 2) / total) as u8);
        Color::new(r, g, b)
    }
}

/// Count pixels per distinct color
pub fn color_histogram(grid: &PixelGrid) -> BTreeMap<Color, usize> {
    let mut histogram = BTreeMap::new();
    for color in grid.scan() {
        *histogram.entry(color).or_insert(0) += 1;
    }
    histogram
}

/// Reduce a color histogram to at most `max_colors` representatives
///
/// A histogram that already fits the bound is returned verbatim as the palette.
///
/// # Errors
///
/// Returns an error if `max_colors` is zero or exceeds [`MAX_PALETTE_COLORS`]
pub fn median_cut(histogram: &BTreeMap<Color, usize>, max_colors: usize) -> Result<Palette> {
    if max_colors == 0 || max_colors > MAX_PALETTE_COLORS {
        return Err(invalid_parameter(
            "max_colors",
            &max_colors,
            &format!("must be between 1 and {MAX_PALETTE_COLORS}"),
        ));
    }

    if histogram.len() <= max_colors {
        return Ok(Palette {
            colors: histogram.keys().copied().collect(),
        });
    }

    let mut boxes = vec![ColorBox::new(
        histogram
            .iter()
            .map(|(&color, &count)| (color, count))
            .collect(),
    )];

    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, color_box)| color_box.is_splittable())
            .max_by_key(|(index, color_box)| (color_box.population, std::cmp::Reverse(*index)))
            .map(|(index, _)| index);

        let Some(index) = candidate else {
            break;
        };

        let (lower, upper) = boxes.swap_remove(index).split();
        boxes.push(lower);
        boxes.push(upper);
    }

    let mut colors: Vec<Color> = boxes.iter().map(ColorBox::mean_color).collect();
    colors.sort_unstable();
    colors.dedup();

    Ok(Palette { colors })
}

/// Map every pixel to its nearest palette color
///
/// Returns the quantized grid together with the palette used.
///
/// # Errors
///
/// Returns an error if `max_colors` is outside `1..=MAX_PALETTE_COLORS`
pub fn quantize(grid: &PixelGrid, max_colors: usize) -> Result<(PixelGrid, Palette)> {
    let histogram = color_histogram(grid);
    let palette = median_cut(&histogram, max_colors)?;

    let lookup: HashMap<Color, Color> = histogram
        .keys()
        .map(|&color| (color, palette.nearest(color)))
        .collect();

    let mut quantized = grid.clone();
    quantized.map_colors(|color| lookup.get(&color).copied().unwrap_or(color));

    Ok((quantized, palette))
}
