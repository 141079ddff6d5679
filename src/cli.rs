//! Command line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert a photo of a 9x9 Sudoku puzzle into an 81-character digit grid
#[derive(Debug, Parser)]
#[command(name = "sudoku-scan", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan puzzle photos with the external OCR engine
    Scan(ScanArgs),
    /// Assemble a grid from a recorded OCR observation dump (JSON)
    Assemble(AssembleArgs),
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Square puzzle photos to scan
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Write the grid to a file instead of stdout (single image only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save a JSON report of the batch run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Save the raw OCR observations next to the grid (single image only)
    #[arg(long)]
    pub dump_observations: Option<PathBuf>,

    /// Tesseract binary name or path (overrides config)
    #[arg(long)]
    pub tesseract: Option<String>,

    /// Tesseract page segmentation mode (overrides config)
    #[arg(long)]
    pub psm: Option<u8>,

    /// Verbosity (-v for per-image diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Args)]
pub struct AssembleArgs {
    /// Observation dump produced by `scan --dump-observations`
    pub observations: PathBuf,

    /// Write the grid to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
