/// Cumulative-row sampling and the seeded random source
pub mod sampler;
/// Monochrome masks that force minority-tone cells white
pub mod silhouette;
/// Chain walker painting colors in scan order
pub mod synthesizer;
