//! First-order Markov chain image synthesis over quantized colors
//!
//! A source image is reduced to a bounded palette and scanned column by column
//! to count which color follows which. The normalized counts form a transition
//! table that is then walked to paint a new image with the same first-order
//! color statistics, optionally inside the source's black/white silhouette.

#![forbid(unsafe_code)]

/// Chain sampling and image synthesis
pub mod algorithm;
/// Color quantization and transition model building
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Pixel grid storage and scan order
pub mod spatial;

pub use algorithm::silhouette::SilhouetteMask;
pub use algorithm::synthesizer::{MarkovSynthesizer, synthesize};
pub use analysis::color::Color;
pub use analysis::transitions::{ModelBuilder, TransitionTable, build_model};
pub use io::error::{AlgorithmError, Result};
pub use spatial::grid::PixelGrid;
