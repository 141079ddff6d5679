//! Scan pipeline
//!
//! Ties the external OCR engine, the pure grid core, and an injected
//! output sink together: image path -> observations -> cells -> grid ->
//! sink. Batch runs process images in parallel and report progress
//! through a callback so the library stays free of terminal concerns.

use crate::grid::{self, Grid, GridError, ObservationSet};
use crate::ocr::{OcrError, TesseractEngine, TesseractOptions};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Scan pipeline error types
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Sink error: {0}")]
    Sink(#[source] std::io::Error),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

// ============================================================
// Sinks
// ============================================================

/// Destination for an assembled grid string.
///
/// The string is always 9 lines of 9 characters joined by newlines;
/// sinks decide what to do with it (print, write, collect).
pub trait GridSink {
    fn accept(&mut self, grid: &str) -> Result<()>;
}

/// Prints the grid to stdout, followed by a newline
#[derive(Debug, Default)]
pub struct StdoutSink;

impl GridSink for StdoutSink {
    fn accept(&mut self, grid: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", grid).map_err(ScanError::Sink)
    }
}

/// Writes the grid to a file with a trailing newline
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GridSink for FileSink {
    fn accept(&mut self, grid: &str) -> Result<()> {
        std::fs::write(&self.path, format!("{}\n", grid)).map_err(ScanError::Sink)
    }
}

/// Collects grids in memory; used in tests and by batch reporting
#[derive(Debug, Default)]
pub struct CollectSink {
    pub grids: Vec<String>,
}

impl GridSink for CollectSink {
    fn accept(&mut self, grid: &str) -> Result<()> {
        self.grids.push(grid.to_string());
        Ok(())
    }
}

// ============================================================
// Progress
// ============================================================

/// Progress reporting callback for pipeline runs
pub trait ProgressCallback: Sync {
    fn on_step_start(&self, _message: &str) {}
    fn on_step_progress(&self, _current: usize, _total: usize) {}
    fn on_step_complete(&self, _step: &str, _detail: &str) {}
    fn on_debug(&self, _message: &str) {}
}

/// Silent progress callback
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressCallback for NullProgress {}

/// Console progress with an indicatif bar and optional debug output
pub struct ConsoleProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl ConsoleProgress {
    pub fn new(total: usize, verbose: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar, verbose }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_step_start(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn on_step_progress(&self, current: usize, _total: usize) {
        self.bar.set_position(current as u64);
    }

    fn on_step_complete(&self, step: &str, detail: &str) {
        self.bar.println(format!("{}: {}", step, detail));
    }

    fn on_debug(&self, message: &str) {
        if self.verbose {
            self.bar.println(message.to_string());
        }
    }
}

// ============================================================
// Report
// ============================================================

/// Outcome of scanning one image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Source image path
    pub image: PathBuf,
    /// Assembled grid, present when the scan succeeded
    pub grid: Option<String>,
    /// Number of cells that received a digit
    pub filled_cells: usize,
    /// Number of raw OCR observations
    pub observation_count: usize,
    /// Error message when the scan failed
    pub error: Option<String>,
}

/// Report for a batch run, serializable for later inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Build a report for one already-scanned image
    pub fn single(image: &Path, grid: &Grid, set: &ObservationSet) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            entries: vec![ScanEntry {
                image: image.to_path_buf(),
                grid: Some(grid.render()),
                filled_cells: grid.filled_count(),
                observation_count: set.observations.len(),
                error: None,
            }],
        }
    }

    /// Number of images that produced a grid
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.grid.is_some()).count()
    }

    /// Write the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

// ============================================================
// Pipeline
// ============================================================

/// Full photo-to-grid pipeline backed by an external OCR engine
pub struct ScanPipeline {
    engine: TesseractEngine,
}

impl ScanPipeline {
    /// Build a pipeline, locating the OCR binary up front
    pub fn new(options: &TesseractOptions) -> Result<Self> {
        Ok(Self {
            engine: TesseractEngine::new(options)?,
        })
    }

    /// Scan one image, returning the grid and the raw observation set.
    ///
    /// Geometry is read from the image and threaded through the mapper
    /// per call; nothing about a run is kept on the pipeline, so runs
    /// over different images are independent.
    pub fn scan(&self, image_path: &Path) -> Result<(Grid, ObservationSet)> {
        let set = self.engine.observe(image_path)?;
        let grid = grid::reconstruct(&set)?;
        Ok((grid, set))
    }

    /// Scan many images in parallel and build a report.
    ///
    /// Per-image failures are recorded in the report instead of aborting
    /// the batch; grids are reported in input order.
    pub fn scan_batch<P: ProgressCallback>(
        &self,
        images: &[PathBuf],
        progress: &P,
    ) -> ScanReport {
        let started_at = Utc::now();
        let start = Instant::now();
        progress.on_step_start("scanning");

        let done = std::sync::atomic::AtomicUsize::new(0);
        let entries: Vec<ScanEntry> = images
            .par_iter()
            .map(|path| {
                let entry = match self.scan(path) {
                    Ok((grid, set)) => ScanEntry {
                        image: path.clone(),
                        filled_cells: grid.filled_count(),
                        observation_count: set.observations.len(),
                        grid: Some(grid.render()),
                        error: None,
                    },
                    Err(e) => {
                        progress.on_debug(&format!("{}: {}", path.display(), e));
                        ScanEntry {
                            image: path.clone(),
                            grid: None,
                            filled_cells: 0,
                            observation_count: 0,
                            error: Some(e.to_string()),
                        }
                    }
                };
                let current = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                progress.on_step_progress(current, images.len());
                entry
            })
            .collect();

        let report = ScanReport {
            started_at,
            finished_at: Utc::now(),
            entries,
        };
        progress.on_step_complete(
            "scan",
            &format!(
                "{}/{} images in {:.1}s",
                report.success_count(),
                images.len(),
                start.elapsed().as_secs_f64()
            ),
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ImageGeometry, NormPoint, Observation};

    fn sample_set() -> ObservationSet {
        ObservationSet::new(
            ImageGeometry::new(900.0).unwrap(),
            vec![
                Observation::new(NormPoint::new(0.0, 0.95), "5"),
                Observation::new(NormPoint::new(0.89, 0.0), "9"),
            ],
        )
    }

    #[test]
    fn test_collect_sink() {
        let grid = grid::reconstruct(&sample_set()).unwrap();
        let mut sink = CollectSink::default();
        sink.accept(&grid.render()).unwrap();
        assert_eq!(sink.grids.len(), 1);
        assert!(sink.grids[0].starts_with("500000000\n"));
        assert!(sink.grids[0].ends_with("000000009"));
    }

    #[test]
    fn test_file_sink_trailing_newline() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("grid.txt");
        let grid = grid::reconstruct(&sample_set()).unwrap();

        let mut sink = FileSink::new(&path);
        sink.accept(&grid.render()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 9);
        assert!(written.ends_with("000000009\n"));
    }

    #[test]
    fn test_scan_report_counts_and_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("report.json");

        let report = ScanReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            entries: vec![
                ScanEntry {
                    image: PathBuf::from("a.png"),
                    grid: Some(Grid::empty().render()),
                    filled_cells: 0,
                    observation_count: 0,
                    error: None,
                },
                ScanEntry {
                    image: PathBuf::from("b.png"),
                    grid: None,
                    filled_cells: 0,
                    observation_count: 0,
                    error: Some("Image not found".to_string()),
                },
            ],
        };
        assert_eq!(report.success_count(), 1);

        report.save(&path).unwrap();
        let loaded: ScanReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[1].error.as_deref(), Some("Image not found"));
    }

    #[test]
    fn test_single_image_report() {
        let set = sample_set();
        let grid = grid::reconstruct(&set).unwrap();
        let report = ScanReport::single(Path::new("puzzle.png"), &grid, &set);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.entries[0].filled_cells, 2);
        assert_eq!(report.entries[0].observation_count, 2);
        assert!(report.entries[0].error.is_none());
    }

    #[test]
    fn test_null_progress_is_silent() {
        let progress = NullProgress;
        progress.on_step_start("x");
        progress.on_step_progress(1, 2);
        progress.on_step_complete("x", "y");
        progress.on_debug("z");
    }
}
