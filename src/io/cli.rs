//! Command-line interface for batch image synthesis over files and directories

use crate::algorithm::silhouette::SilhouetteMask;
use crate::algorithm::synthesizer::MarkovSynthesizer;
use crate::analysis::color::Color;
use crate::analysis::transitions::ModelBuilder;
use crate::io::configuration::{
    DEFAULT_OUTPUT_DIR, MAX_PALETTE_COLORS, MODEL_SUFFIX, OUTPUT_PREFIX, SUPPORTED_EXTENSIONS,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{export_grid_as_png, load_source_image, write_text};
use crate::io::progress::{ProgressManager, Stage};
use clap::{Parser, ValueEnum};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How generated images relate to their source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Source dimensions, chain advances per column, minority tone forced white
    #[default]
    Silhouette,
    /// Arbitrary dimensions, chain advances per pixel
    Plain,
}

#[derive(Parser)]
#[command(name = "chromachain")]
#[command(
    author,
    version,
    about = "Generate images from first-order color transition statistics"
)]
/// Command-line arguments for the synthesis tool
pub struct Cli {
    /// Input JPEG/PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory generated images are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Explicit output filename (single-file targets only)
    #[arg(short = 'f', long)]
    pub output_file: Option<PathBuf>,

    /// Synthesis mode
    #[arg(short, long, value_enum, default_value_t = Mode::Silhouette)]
    pub mode: Mode,

    /// Output width in pixels, plain mode only (implies square if height not specified)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output height in pixels, plain mode only
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Random seed for reproducible generation (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Starting color of the chain as #rrggbb (random table color when omitted)
    #[arg(short = 'c', long, value_parser = parse_color)]
    pub start_color: Option<Color>,

    /// Maximum palette size after quantization
    #[arg(short = 'k', long, default_value_t = MAX_PALETTE_COLORS)]
    pub colors: usize,

    /// Also write the transition table as JSON next to each output
    #[arg(long)]
    pub save_model: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

fn parse_color(value: &str) -> std::result::Result<Color, String> {
    Color::from_hex(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Output size requested for plain mode, `None` to follow the source
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are given in silhouette mode
    pub fn requested_dimensions(&self) -> Result<Option<(usize, usize)>> {
        let dimensions = match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            (Some(w), None) => Some((w, w)),
            (None, Some(h)) => Some((h, h)),
            (None, None) => None,
        };

        if self.mode == Mode::Silhouette {
            if let Some((w, h)) = dimensions {
                return Err(invalid_parameter(
                    "dimensions",
                    &format!("{w}x{h}"),
                    &"silhouette mode always uses the source dimensions",
                ));
            }
        }

        Ok(dimensions)
    }
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files that produced an output image
    pub generated: Vec<PathBuf>,
    /// Files skipped because their output already exists
    pub skipped: Vec<PathBuf>,
    /// Files that failed, with the reason
    pub failed: Vec<(PathBuf, AlgorithmError)>,
}

impl BatchSummary {
    /// Whether every attempted file succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Orchestrates batch processing of source images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Failures of individual files are collected in the summary without
    /// stopping the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments or the target are invalid
    pub fn process(&mut self) -> Result<BatchSummary> {
        ModelBuilder::new(self.cli.colors)?;
        self.cli.requested_dimensions()?;

        let (files, skipped) = self.collect_files()?;
        let mut summary = BatchSummary {
            skipped,
            ..BatchSummary::default()
        };

        // Each output path belongs to the first input (in sorted order) that maps to it
        let mut claimed = HashSet::new();
        let (files, collisions): (Vec<PathBuf>, Vec<PathBuf>) = files
            .into_iter()
            .partition(|file| claimed.insert(self.output_path(file)));
        for file in collisions {
            let output_path = self.output_path(&file);
            log::debug!(
                "{} collides with an earlier input on {}",
                file.display(),
                output_path.display()
            );
            summary.failed.push((
                file,
                invalid_parameter(
                    "output",
                    &output_path.display(),
                    &"another input in this batch writes the same output file",
                ),
            ));
        }

        if files.is_empty() {
            return Ok(summary);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            let start_time = Instant::now();
            match self.process_file(file, index) {
                Ok(output_path) => {
                    log::debug!(
                        "generated {} from {} in {:.2?}",
                        output_path.display(),
                        file.display(),
                        start_time.elapsed()
                    );
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.complete_file(index);
                    }
                    summary.generated.push(output_path);
                }
                Err(error) => {
                    log::debug!("failed to process {}: {error}", file.display());
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.fail_file(index);
                    }
                    summary.failed.push((file.clone(), error));
                }
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(summary)
    }

    fn collect_files(&self) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let candidates = if self.cli.target.is_file() {
            if !is_supported_image(&self.cli.target) {
                return Err(crate::io::error::io_error(
                    "Target file must be a JPEG or PNG image",
                ));
            }
            vec![self.cli.target.clone()]
        } else if self.cli.target.is_dir() {
            if self.cli.output_file.is_some() {
                return Err(invalid_parameter(
                    "output_file",
                    &self.cli.target.display(),
                    &"an explicit output file requires a single-file target",
                ));
            }
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target).map_err(|e| {
                AlgorithmError::FileSystem {
                    path: self.cli.target.clone(),
                    operation: "read directory",
                    source: e,
                }
            })? {
                let path = entry?.path();
                if path.is_file() && is_supported_image(&path) {
                    files.push(path);
                }
            }
            files.sort();
            files
        } else {
            return Err(crate::io::error::io_error(
                "Target must be an image file or directory",
            ));
        };

        let (files, skipped): (Vec<PathBuf>, Vec<PathBuf>) = candidates
            .into_iter()
            .partition(|path| self.should_process_file(path));
        Ok((files, skipped))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            log::debug!(
                "skipping {}: {} exists",
                input_path.display(),
                output_path.display()
            );
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<PathBuf> {
        let output_path = self.output_path(input_path);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let source = load_source_image(input_path)?;
        let rgb = source.to_rgb8();

        self.advance(index, Stage::Modeling);
        let table = ModelBuilder::new(self.cli.colors)?.build(&rgb)?;

        self.advance(index, Stage::Synthesizing);
        let mut synthesizer = MarkovSynthesizer::new(&table, self.cli.seed)?;
        let grid = match self.cli.mode {
            Mode::Silhouette => {
                let mask = SilhouetteMask::from_image(&source);
                synthesizer.synthesize(
                    mask.width(),
                    mask.height(),
                    self.cli.start_color,
                    Some(&mask),
                )?
            }
            Mode::Plain => {
                let (width, height) = self
                    .cli
                    .requested_dimensions()?
                    .unwrap_or((rgb.width() as usize, rgb.height() as usize));
                synthesizer.synthesize(width, height, self.cli.start_color, None)?
            }
        };

        self.advance(index, Stage::Saving);
        export_grid_as_png(&grid, &output_path)?;

        if self.cli.save_model {
            write_text(&Self::model_path(&output_path), &table.to_json()?)?;
        }

        Ok(output_path)
    }

    fn advance(&mut self, index: usize, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.advance(index, stage);
        }
    }

    /// Where the generated image for `input_path` is written
    ///
    /// The full source file name is kept so `cat.jpg` and `cat.png` stay
    /// apart: `generated_cat.png` and `generated_cat.jpg.png`. Output is
    /// always PNG-encoded, so `.png` is appended unless already present.
    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        if let Some(ref explicit) = self.cli.output_file {
            return explicit.clone();
        }

        let file_name = input_path.file_name().unwrap_or_default().to_string_lossy();
        let output_name = if has_extension(input_path, "png") {
            format!("{OUTPUT_PREFIX}{file_name}")
        } else {
            format!("{OUTPUT_PREFIX}{file_name}.png")
        };
        self.cli.output_dir.join(output_name)
    }

    fn model_path(output_path: &Path) -> PathBuf {
        let stem = output_path.file_stem().unwrap_or_default();
        let model_name = format!("{}{MODEL_SUFFIX}", stem.to_string_lossy());

        if let Some(parent) = output_path.parent() {
            parent.join(model_name)
        } else {
            PathBuf::from(model_name)
        }
    }
}

/// Whether the path carries a supported image extension, ignoring case
pub fn is_supported_image(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| has_extension(path, supported))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
