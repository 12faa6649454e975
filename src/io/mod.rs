//! Input/output boundary: CLI driver, image files, progress and errors

/// Command-line parsing and batch file processing
pub mod cli;
/// Constants and configuration defaults
pub mod configuration;
/// Error type shared by every module
pub mod error;
/// Image decoding and PNG export
pub mod image;
/// Terminal progress display
pub mod progress;
