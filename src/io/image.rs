//! Image decoding and PNG export at the file boundary

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::PixelGrid;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

/// Decode a JPEG or PNG source image
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_source_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| AlgorithmError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Encode the grid as PNG regardless of the path's extension
///
/// # Errors
///
/// Returns an error if:
/// - The grid has no pixels
/// - The parent directory cannot be created
/// - The image cannot be written
pub fn export_grid_as_png(grid: &PixelGrid, output_path: &Path) -> Result<()> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(AlgorithmError::InvalidSourceData {
            reason: "Cannot export an empty grid".to_string(),
        });
    }

    create_parent_dir(output_path)?;

    grid.to_rgb_image()
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Write text content such as a JSON model dump
///
/// # Errors
///
/// Returns an error if the parent directory or the file cannot be written
pub fn write_text(output_path: &Path, content: &str) -> Result<()> {
    create_parent_dir(output_path)?;
    std::fs::write(output_path, content).map_err(|e| AlgorithmError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "write file",
        source: e,
    })
}

fn create_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }
    Ok(())
}
