//! Grid module core types
//!
//! Basic data structures for mapping OCR observations onto the 9x9
//! Sudoku grid and serializing the result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Number of rows (and columns) in a Sudoku grid
pub const GRID_SIZE: usize = 9;

/// Total number of cells in a Sudoku grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Serialized marker for a cell with no detected digit
pub const BLANK: u8 = b'0';

// ============================================================
// Error Types
// ============================================================

/// Grid mapping and assembly error types
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid image edge length: {0} (must be positive and finite)")]
    InvalidEdgeLength(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;

// ============================================================
// Core Data Structures
// ============================================================

/// A point in normalized image coordinates.
///
/// Both axes are in [0,1], origin at the lower-left corner, Y up.
/// This matches the coordinate convention of OCR engines that report
/// bounding boxes relative to the image rather than in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    /// Create a new normalized point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One OCR-reported text fragment.
///
/// `origin` is the lower-left corner of the fragment's bounding box in
/// normalized coordinates; `text` is the engine's top recognition
/// candidate and may be empty, multi-character, or non-numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Lower-left corner of the bounding box (normalized, Y up)
    pub origin: NormPoint,
    /// Top recognition candidate, carried through unmodified
    pub text: String,
}

impl Observation {
    /// Create a new observation
    pub fn new(origin: NormPoint, text: impl Into<String>) -> Self {
        Self {
            origin,
            text: text.into(),
        }
    }
}

/// Geometry of the (square) source image for one processing run.
///
/// The puzzle is assumed to fill the full width, so the edge length is
/// the basis for both axes. Passed explicitly per call so concurrent
/// runs never share mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    edge_length: f64,
}

impl ImageGeometry {
    /// Create a geometry from a pixel edge length.
    ///
    /// Rejects zero, negative, and non-finite lengths up front rather
    /// than letting them produce nonsensical cell indices downstream.
    pub fn new(edge_length: f64) -> Result<Self> {
        if !edge_length.is_finite() || edge_length <= 0.0 {
            return Err(GridError::InvalidEdgeLength(edge_length));
        }
        Ok(Self { edge_length })
    }

    /// Pixel edge length of the square source image
    pub fn edge_length(&self) -> f64 {
        self.edge_length
    }

    /// Pixel size of one grid cell
    pub fn cell_size(&self) -> f64 {
        self.edge_length / GRID_SIZE as f64
    }
}

/// A text fragment resolved to a grid cell.
///
/// Produced independently from exactly one [`Observation`]; no
/// cross-observation state is involved in mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCell {
    /// Grid row, 0-indexed from the top
    pub row: usize,
    /// Grid column, 0-indexed from the left
    pub column: usize,
    /// Raw recognized text, unmodified
    pub text: String,
}

impl DetectedCell {
    /// Create a new detected cell
    pub fn new(row: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            row,
            column,
            text: text.into(),
        }
    }
}

// ============================================================
// Grid
// ============================================================

/// The assembled 9x9 digit grid.
///
/// Always fully populated: each of the 81 cells holds a digit `1`-`9`
/// or `0` meaning "no digit assigned". Serialized as 9 lines of 9
/// characters joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [u8; CELL_COUNT],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: [BLANK; CELL_COUNT],
        }
    }
}

impl Grid {
    /// Create an all-blank grid
    pub fn empty() -> Self {
        Self::default()
    }

    /// Digit at (row, column), 0 for blank
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.cells[row * GRID_SIZE + column] - b'0'
    }

    /// Write a digit (1-9) at (row, column), overwriting any prior value
    pub(crate) fn set(&mut self, row: usize, column: usize, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.cells[row * GRID_SIZE + column] = b'0' + digit;
    }

    /// Number of cells holding a digit
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != BLANK).count()
    }

    /// Render as 9 newline-separated lines of 9 characters.
    ///
    /// Pure function of grid contents; no trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(CELL_COUNT + GRID_SIZE - 1);
        for row in 0..GRID_SIZE {
            if row > 0 {
                out.push('\n');
            }
            for column in 0..GRID_SIZE {
                out.push(self.cells[row * GRID_SIZE + column] as char);
            }
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ============================================================
// Observation Dumps
// ============================================================

/// A recorded OCR pass: the run geometry plus every observation.
///
/// This is the JSON interchange format between an OCR front end and the
/// pure core, and what the `assemble` subcommand consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationSet {
    /// Pixel edge length of the square source image
    pub edge_length: f64,
    /// OCR observations in engine result order
    pub observations: Vec<Observation>,
}

impl ObservationSet {
    /// Create a set from a validated geometry
    pub fn new(geometry: ImageGeometry, observations: Vec<Observation>) -> Self {
        Self {
            edge_length: geometry.edge_length(),
            observations,
        }
    }

    /// Validated geometry for this run
    pub fn geometry(&self) -> Result<ImageGeometry> {
        ImageGeometry::new(self.edge_length)
    }

    /// Write the set as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a set from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let set: Self = serde_json::from_str(&json)?;
        Ok(set)
    }
}
