use crate::{
    analysis::color::Color,
    analysis::transitions::TransitionTable,
    io::error::{AlgorithmError, Result, degenerate_model},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;

/// Seeded random source for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a selector seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic when a seed is given, entropy-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Uniform draw from `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform index into a collection of `len` items
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }
}

/// Cumulative distribution over the table alphabet for one source color
///
/// Weights are renormalized by their sum, so rows whose probabilities drift
/// from 1.0 still yield a proper distribution. The final entry is exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeRow {
    colors: Vec<Color>,
    cumulative: Vec<f64>,
}

impl CumulativeRow {
    /// Build the cumulative row of `source` over `alphabet`
    ///
    /// Destinations outside the alphabet carry no weight.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` has no row or the row has no positive
    /// mass on the alphabet
    pub fn new(table: &TransitionTable, alphabet: &[Color], source: Color) -> Result<Self> {
        let row = table.row(source).ok_or_else(|| AlgorithmError::UnknownColor {
            color: source.to_hex(),
        })?;

        let weights: Vec<f64> = alphabet
            .iter()
            .map(|color| row.get(color).copied().unwrap_or(0.0))
            .collect();

        Self::from_weights(alphabet, &weights).ok_or_else(|| {
            degenerate_model(&source, &"no probability mass on any color of the alphabet")
        })
    }

    /// Normalize raw weights into a cumulative row, `None` without positive mass
    pub fn from_weights(colors: &[Color], weights: &[f64]) -> Option<Self> {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        let mut running = 0.0;
        let mut cumulative: Vec<f64> = weights
            .iter()
            .map(|&weight| {
                if weight.is_finite() && weight > 0.0 {
                    running += weight;
                }
                running / total
            })
            .collect();

        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Some(Self {
            colors: colors.to_vec(),
            cumulative,
        })
    }

    /// Color whose cumulative interval contains `draw`
    ///
    /// Selects the first entry whose cumulative probability exceeds `draw`, so
    /// zero-weight colors are never chosen for draws in `[0, 1)`.
    pub fn sample(&self, draw: f64) -> Option<Color> {
        let index = self.cumulative.partition_point(|&bound| bound <= draw);
        let index = index.min(self.colors.len().saturating_sub(1));
        self.colors.get(index).copied()
    }

    /// Cumulative probabilities aligned with the alphabet
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

/// Draws successor colors from a transition table
///
/// Cumulative rows are built lazily, once per source color, and reused for
/// every later step from that color.
pub struct TransitionSampler<'t> {
    table: &'t TransitionTable,
    alphabet: Vec<Color>,
    rows: HashMap<Color, CumulativeRow>,
}

impl<'t> TransitionSampler<'t> {
    /// Create a sampler over the table's full alphabet
    pub fn new(table: &'t TransitionTable) -> Self {
        Self {
            table,
            alphabet: table.alphabet(),
            rows: HashMap::new(),
        }
    }

    /// Colors that can be produced, in key order
    pub fn alphabet(&self) -> &[Color] {
        &self.alphabet
    }

    /// Number of cached cumulative rows
    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }

    /// Map a uniform draw to the successor of `current`
    ///
    /// # Errors
    ///
    /// Returns an error if `current` is not a source color of the table or
    /// its row has no usable mass
    pub fn successor(&mut self, current: Color, draw: f64) -> Result<Color> {
        use std::collections::hash_map::Entry;

        let row = match self.rows.entry(current) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(CumulativeRow::new(self.table, &self.alphabet, current)?)
            }
        };

        row.sample(draw)
            .ok_or_else(|| degenerate_model(&current, &"empty alphabet"))
    }

    /// Draw the successor of `current` using the selector
    ///
    /// # Errors
    ///
    /// Returns an error if `current` cannot be sampled from
    pub fn next_color(&mut self, current: Color, selector: &mut RandomSelector) -> Result<Color> {
        let draw = selector.unit();
        self.successor(current, draw)
    }
}
