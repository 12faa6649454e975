//! Model constants and runtime configuration defaults

// Keeps transition statistics from becoming hopelessly sparse
/// Upper bound on the quantized palette size
pub const MAX_PALETTE_COLORS: usize = 50;

/// Luma value at or above which a source pixel counts as white in the silhouette mask
pub const MONOCHROME_THRESHOLD: u8 = 128;

/// Tolerance for row sums of a normalized transition table
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Directory generated images are written to unless overridden
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Prefix added to output filenames
pub const OUTPUT_PREFIX: &str = "generated_";
/// Suffix of the optional JSON model dump
pub const MODEL_SUFFIX: &str = "_model.json";
/// Source file extensions picked up by directory scans (matched case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["jpg", "png"];
