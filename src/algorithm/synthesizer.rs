use crate::{
    algorithm::sampler::{RandomSelector, TransitionSampler},
    algorithm::silhouette::SilhouetteMask,
    analysis::color::Color,
    analysis::transitions::TransitionTable,
    io::error::{AlgorithmError, Result, degenerate_model, invalid_parameter},
    spatial::grid::PixelGrid,
};

/// How the chain is painted onto the output grid
#[derive(Clone, Copy, Debug)]
pub enum SynthesisMode<'m> {
    /// One chain step per cell
    Plain,
    /// One chain step per column; minority-tone cells of the mask are painted white
    Silhouette(&'m SilhouetteMask),
}

impl<'m> From<Option<&'m SilhouetteMask>> for SynthesisMode<'m> {
    fn from(mask: Option<&'m SilhouetteMask>) -> Self {
        mask.map_or(Self::Plain, Self::Silhouette)
    }
}

/// Markov chain walker that paints colors in scan order
///
/// Owns its random source and per-color sampling cache; the transition table
/// is only borrowed and never modified.
pub struct MarkovSynthesizer<'t> {
    sampler: TransitionSampler<'t>,
    selector: RandomSelector,
    steps: usize,
}

impl<'t> MarkovSynthesizer<'t> {
    /// Create a synthesizer over `table`
    ///
    /// A `None` seed draws from operating system entropy.
    ///
    /// # Errors
    ///
    /// Returns an error if the table has no source colors
    pub fn new(table: &'t TransitionTable, seed: Option<u64>) -> Result<Self> {
        if table.is_empty() {
            return Err(degenerate_model(&"", &"transition table has no entries"));
        }

        Ok(Self {
            sampler: TransitionSampler::new(table),
            selector: RandomSelector::from_seed(seed),
            steps: 0,
        })
    }

    /// Chain steps taken across all synthesis calls
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Paint a `width` × `height` grid
    ///
    /// The cursor starts at `start_color`, or at a uniformly chosen alphabet
    /// color when none is given. Passing a mask selects silhouette mode.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `width` or `height` is zero
    /// - The mask dimensions differ from the requested size
    /// - `start_color` is not a source color of the table
    /// - A visited row of the table has no usable probability mass
    pub fn synthesize(
        &mut self,
        width: usize,
        height: usize,
        start_color: Option<Color>,
        mask: Option<&SilhouetteMask>,
    ) -> Result<PixelGrid> {
        if width == 0 {
            return Err(invalid_parameter("width", &width, &"must be positive"));
        }
        if height == 0 {
            return Err(invalid_parameter("height", &height, &"must be positive"));
        }
        if let Some(mask) = mask {
            if mask.width() != width || mask.height() != height {
                return Err(invalid_parameter(
                    "mask",
                    &format!("{}x{}", mask.width(), mask.height()),
                    &format!("must match the output size {width}x{height}"),
                ));
            }
        }

        let mut current = self.starting_color(start_color)?;
        let mut grid = PixelGrid::new(width, height, Color::BLACK);

        match SynthesisMode::from(mask) {
            SynthesisMode::Plain => {
                for column in 0..width {
                    for row in 0..height {
                        let next = self.step(current)?;
                        grid.set(column, row, next);
                        current = next;
                    }
                }
            }
            SynthesisMode::Silhouette(mask) => {
                for column in 0..width {
                    let next = self.step(current)?;
                    for row in 0..height {
                        let color = if mask.is_forced_white(column, row) {
                            Color::WHITE
                        } else {
                            next
                        };
                        grid.set(column, row, color);
                    }
                    current = next;
                }
            }
        }

        Ok(grid)
    }

    fn starting_color(&mut self, start_color: Option<Color>) -> Result<Color> {
        match start_color {
            Some(color) if self.sampler.alphabet().binary_search(&color).is_ok() => Ok(color),
            Some(color) => Err(AlgorithmError::UnknownColor {
                color: color.to_hex(),
            }),
            None => {
                let alphabet = self.sampler.alphabet();
                self.selector
                    .index(alphabet.len())
                    .and_then(|index| alphabet.get(index).copied())
                    .ok_or_else(|| degenerate_model(&"", &"transition table has no entries"))
            }
        }
    }

    fn step(&mut self, current: Color) -> Result<Color> {
        self.steps += 1;
        self.sampler.next_color(current, &mut self.selector)
    }
}

/// Synthesize a single grid from `table`
///
/// Convenience wrapper around [`MarkovSynthesizer`] for one-off generation.
///
/// # Errors
///
/// Returns an error under the same conditions as [`MarkovSynthesizer::synthesize`],
/// or if the table is empty
pub fn synthesize(
    table: &TransitionTable,
    width: usize,
    height: usize,
    start_color: Option<Color>,
    mask: Option<&SilhouetteMask>,
    seed: Option<u64>,
) -> Result<PixelGrid> {
    MarkovSynthesizer::new(table, seed)?.synthesize(width, height, start_color, mask)
}
