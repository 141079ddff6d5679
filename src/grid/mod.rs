//! Grid reconstruction module
//!
//! Maps OCR text observations onto the 81 cells of a Sudoku grid and
//! assembles the canonical 9-line digit string. This is the pure core of
//! the crate: no I/O, no shared state, geometry threaded per call.

pub mod assemble;
pub mod map;
pub mod types;

pub use assemble::assemble;
pub use map::{map_observation, map_observations};
pub use types::{
    DetectedCell, Grid, GridError, ImageGeometry, NormPoint, Observation, ObservationSet, Result,
    BLANK, CELL_COUNT, GRID_SIZE,
};

/// Rebuild the full grid from a recorded OCR pass.
///
/// Validates the run geometry, maps every observation to its cell, and
/// assembles the result. The only failure mode is invalid geometry;
/// malformed observation text degrades to blank cells.
pub fn reconstruct(set: &ObservationSet) -> Result<Grid> {
    let geometry = set.geometry()?;
    let cells = map_observations(&set.observations, geometry);
    Ok(assemble(&cells))
}
