//! Analysis modules for palette reduction and transition statistics

/// Colors and their canonical hex keys
pub mod color;
/// Median-cut palette reduction
pub mod quantization;
/// Transition counting and probability tables
pub mod transitions;
