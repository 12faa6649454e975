//! CLI entry point for Markov chain image synthesis

use clap::Parser;
use chromachain::io::cli::{Cli, FileProcessor};
use chromachain::io::error::AlgorithmError;

// Allow print for reporting per-file failures once the batch has finished
#[allow(clippy::print_stderr)]
fn main() -> chromachain::Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;
    let mut processor = FileProcessor::new(cli);
    let summary = processor.process()?;

    if !quiet {
        for (path, error) in &summary.failed {
            eprintln!("Failed: {} ({error})", path.display());
        }
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(AlgorithmError::BatchIncomplete {
            failed: summary.failed.len(),
            attempted: summary.failed.len() + summary.generated.len(),
        })
    }
}
