//! Error types for model building, synthesis and file handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all chain operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source data doesn't meet model requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Requested color is not part of the transition table alphabet
    UnknownColor {
        /// Canonical hex key of the color
        color: String,
    },

    /// Transition table cannot drive the chain from the given color
    ///
    /// Occurs when:
    /// - The table has no rows at all
    /// - A row places no probability mass on any color of the alphabet
    DegenerateModel {
        /// Canonical hex key of the source color, empty for an empty table
        color: String,
        /// Description of the failure
        reason: String,
    },

    /// Failed to save generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Transition table could not be encoded or decoded
    Serialization {
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Some files of a batch run could not be generated
    BatchIncomplete {
        /// Files that failed
        failed: usize,
        /// Files attempted, failures included
        attempted: usize,
    },
}

impl AlgorithmError {
    /// Whether the error stems from caller-supplied input rather than a collaborator failure
    ///
    /// Degenerate models count as invalid input: they are only reachable by
    /// handing the synthesizer a table or start color it cannot use.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad { .. }
                | Self::InvalidParameter { .. }
                | Self::UnknownColor { .. }
                | Self::DegenerateModel { .. }
        )
    }
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::UnknownColor { color } => {
                write!(f, "Color {color} is not present in the transition table")
            }
            Self::DegenerateModel { color, reason } => {
                if color.is_empty() {
                    write!(f, "Degenerate transition model: {reason}")
                } else {
                    write!(f, "Degenerate transition model at {color}: {reason}")
                }
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { source } => {
                write!(f, "Transition table serialization failed: {source}")
            }
            Self::BatchIncomplete { failed, attempted } => {
                write!(f, "{failed} of {attempted} files failed")
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for chain results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for AlgorithmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { source: err }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a degenerate model error for the given source color key
pub fn degenerate_model(color: &impl ToString, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::DegenerateModel {
        color: color.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a path error for the batch driver
pub fn io_error(msg: &str) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
