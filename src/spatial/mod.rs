//! Spatial data structures
//!
//! This module contains the pixel grid shared by model building and synthesis,
//! together with the column-major scan order both stages walk.

/// Pixel grid storage and scan order
pub mod grid;

pub use grid::PixelGrid;
