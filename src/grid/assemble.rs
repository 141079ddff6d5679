//! Grid Assembler
//!
//! Folds detected cells into the 9x9 grid: row-major ordering, digit
//! validation, and last-write-wins conflict resolution.

use super::types::{DetectedCell, Grid};

/// Assemble detected cells into a complete grid.
///
/// Cells are stably sorted by (row, column) so the fold is deterministic:
/// when several cells land on the same position with different valid
/// digits, the last occurrence in the original OCR result order wins.
/// Text that does not parse as a single digit 1-9 contributes nothing and
/// never overwrites an existing value.
///
/// Never fails; an empty input yields an all-blank grid.
pub fn assemble(cells: &[DetectedCell]) -> Grid {
    let mut ordered: Vec<&DetectedCell> = cells.iter().collect();
    ordered.sort_by_key(|cell| (cell.row, cell.column));

    let mut grid = Grid::empty();
    for cell in ordered {
        if let Some(digit) = extract_digit(&cell.text) {
            grid.set(cell.row, cell.column, digit);
        }
    }
    grid
}

/// Parse recognized text as a single Sudoku digit.
///
/// Returns `None` for anything that is not a base-10 integer in 1..=9,
/// including empty strings, multi-digit misreads like "15", and zero.
fn extract_digit(text: &str) -> Option<u8> {
    match text.trim().parse::<i32>() {
        Ok(n) if (1..=9).contains(&n) => Some(n as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::map::map_observations;
    use crate::grid::types::{ImageGeometry, NormPoint, Observation};

    #[test]
    fn test_assemble_empty_is_all_blank() {
        // P4: no cells at all yields 81 zeros
        let grid = assemble(&[]);
        assert_eq!(grid.render(), ["000000000"; 9].join("\n"));
    }

    #[test]
    fn test_assemble_single_digit() {
        let grid = assemble(&[DetectedCell::new(0, 0, "5")]);
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.filled_count(), 1);
        assert!(grid.render().starts_with("500000000\n"));
    }

    #[test]
    fn test_digit_filter_rejects_garbage() {
        // P3: no input text can put anything but 0-9 into the grid
        let cells = vec![
            DetectedCell::new(0, 0, "abc"),
            DetectedCell::new(0, 1, "15"),
            DetectedCell::new(0, 2, "0"),
            DetectedCell::new(0, 3, ""),
            DetectedCell::new(0, 4, "-3"),
            DetectedCell::new(0, 5, "3.5"),
        ];
        let grid = assemble(&cells);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_invalid_text_never_overwrites() {
        let cells = vec![
            DetectedCell::new(2, 2, "6"),
            DetectedCell::new(2, 2, "garbage"),
        ];
        let grid = assemble(&cells);
        assert_eq!(grid.get(2, 2), 6);
    }

    #[test]
    fn test_conflict_last_in_ocr_order_wins() {
        // E2E scenario 3: same cell recognized as "3" then "7"
        let cells = vec![DetectedCell::new(4, 4, "3"), DetectedCell::new(4, 4, "7")];
        let grid = assemble(&cells);
        assert_eq!(grid.get(4, 4), 7);
    }

    #[test]
    fn test_conflict_policy_independent_of_other_rows() {
        // The stable sort only groups by (row, column); unrelated cells
        // interleaved between the conflicting pair must not change the winner
        let cells = vec![
            DetectedCell::new(4, 4, "3"),
            DetectedCell::new(0, 0, "1"),
            DetectedCell::new(8, 8, "9"),
            DetectedCell::new(4, 4, "7"),
        ];
        let grid = assemble(&cells);
        assert_eq!(grid.get(4, 4), 7);
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(8, 8), 9);
    }

    #[test]
    fn test_whitespace_trimmed_before_parse() {
        let grid = assemble(&[DetectedCell::new(1, 1, " 8 ")]);
        assert_eq!(grid.get(1, 1), 8);
    }

    #[test]
    fn test_two_digit_misread_leaves_blank() {
        // E2E scenario 4
        let grid = assemble(&[DetectedCell::new(3, 3, "15")]);
        assert_eq!(grid.get(3, 3), 0);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_end_to_end_top_left() {
        // E2E scenario 1: observation at (0.0, 0.95) with text "5"
        let observations = vec![Observation::new(NormPoint::new(0.0, 0.95), "5")];
        let geometry = ImageGeometry::new(900.0).unwrap();
        let cells = map_observations(&observations, geometry);
        assert_eq!((cells[0].row, cells[0].column), (0, 0));

        let grid = assemble(&cells);
        let rendered = grid.render();
        assert_eq!(rendered.lines().next().unwrap(), "500000000");
    }

    #[test]
    fn test_end_to_end_bottom_right() {
        // E2E scenario 2: observation at (0.89, 0.0) with text "9"
        let observations = vec![Observation::new(NormPoint::new(0.89, 0.0), "9")];
        let geometry = ImageGeometry::new(900.0).unwrap();
        let cells = map_observations(&observations, geometry);
        assert_eq!((cells[0].row, cells[0].column), (8, 8));

        let grid = assemble(&cells);
        assert_eq!(grid.render().lines().last().unwrap(), "000000009");
    }

    #[test]
    fn test_full_puzzle_assembly() {
        // A realistic partial puzzle: one digit per box
        let cells = vec![
            DetectedCell::new(0, 0, "5"),
            DetectedCell::new(1, 4, "3"),
            DetectedCell::new(2, 7, "8"),
            DetectedCell::new(4, 1, "2"),
            DetectedCell::new(4, 4, "9"),
            DetectedCell::new(4, 8, "6"),
            DetectedCell::new(6, 2, "4"),
            DetectedCell::new(7, 5, "1"),
            DetectedCell::new(8, 8, "7"),
        ];
        let grid = assemble(&cells);
        assert_eq!(grid.filled_count(), 9);
        let rendered = grid.render();
        assert_eq!(rendered.lines().count(), 9);
        assert!(rendered.lines().all(|l| l.len() == 9));
        assert_eq!(rendered.lines().nth(4).unwrap(), "020090006");
    }
}
