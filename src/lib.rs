//! sudoku-scan
//!
//! Converts a photograph of a 9x9 Sudoku puzzle into a textual grid
//! representation: 81 characters, row-major, `0` for blank cells.
//!
//! The core is the geometric reconstruction in [`grid`]: given text
//! fragments detected by an external OCR engine, each with a normalized
//! bounding-box origin and a recognized string, assign every fragment to
//! one of the 81 cells, resolve conflicts, and emit a canonical 9-line
//! digit grid. [`ocr`] adapts Tesseract's output into that core's input,
//! [`scan`] wires engine, core, and output sinks into a pipeline, and
//! [`config`] supplies user defaults.

pub mod cli;
pub mod config;
pub mod grid;
pub mod ocr;
pub mod scan;

pub use grid::{
    assemble, map_observation, map_observations, reconstruct, DetectedCell, Grid, GridError,
    ImageGeometry, NormPoint, Observation, ObservationSet,
};
pub use ocr::{OcrError, TesseractEngine, TesseractOptions};
pub use scan::{
    CollectSink, ConsoleProgress, FileSink, GridSink, NullProgress, ProgressCallback, ScanError,
    ScanPipeline, ScanReport, StdoutSink,
};
