//! Coordinate Mapper
//!
//! Converts one OCR observation (normalized bounding-box origin plus the
//! source image's edge length) into a discrete (row, column) grid cell.

use super::types::{DetectedCell, ImageGeometry, Observation, GRID_SIZE};

/// Map an observation to the grid cell its bounding-box origin falls in.
///
/// The OCR coordinate system has its origin at the lower-left corner with
/// Y increasing upward, while grid rows are numbered top-down, so the Y
/// axis is flipped before flooring. The result is clamped into [0,8]:
/// origins exactly on the (1,1) or (0,0) image corner would otherwise be
/// able to round to an out-of-range index.
///
/// Pure function; geometry is an explicit argument rather than shared
/// state, so concurrent runs over different images cannot interfere.
pub fn map_observation(observation: &Observation, geometry: ImageGeometry) -> DetectedCell {
    let edge = geometry.edge_length();
    let cell_size = geometry.cell_size();

    let x = observation.origin.x * edge;
    let y = (1.0 - observation.origin.y) * edge;

    let column = clamp_index((x / cell_size).floor());
    let row = clamp_index((y / cell_size).floor());

    DetectedCell::new(row, column, observation.text.clone())
}

/// Map a batch of observations, preserving input order.
pub fn map_observations(observations: &[Observation], geometry: ImageGeometry) -> Vec<DetectedCell> {
    observations
        .iter()
        .map(|obs| map_observation(obs, geometry))
        .collect()
}

fn clamp_index(value: f64) -> usize {
    value.clamp(0.0, (GRID_SIZE - 1) as f64) as usize
}
