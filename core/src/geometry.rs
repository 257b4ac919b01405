use core::f32::consts::SQRT_2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where to draw the stroke across a winning line.
///
/// Points are `(x, y)` cell centers, with `x` following columns and `y` following rows.
/// Lengths and points are in cell units until [`LineGeometry::scaled`] is applied.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    /// Clockwise rotation in screen space: 0 horizontal, 90 vertical, 45 and -45 for diagonals.
    pub angle_degrees: f32,
    /// Stroke length covering every cell of the line edge to edge.
    pub length: f32,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl LineGeometry {
    pub fn of(line: &WinningLine) -> Self {
        let direction = line.direction();
        let step = if direction.is_diagonal() { SQRT_2 } else { 1.0 };
        let center = |(row, col): Coord2| (f32::from(col) + 0.5, f32::from(row) + 0.5);

        let cells = line.cells();
        let (start, end) = match (cells.first(), cells.last()) {
            (Some(&first), Some(&last)) => (center(first), center(last)),
            _ => ((0.0, 0.0), (0.0, 0.0)),
        };

        Self {
            angle_degrees: angle_degrees(direction),
            length: cells.len() as f32 * step,
            start,
            end,
        }
    }

    /// Converts cell units into pixels for cells `cell_size` wide.
    pub fn scaled(self, cell_size: f32) -> Self {
        Self {
            angle_degrees: self.angle_degrees,
            length: self.length * cell_size,
            start: (self.start.0 * cell_size, self.start.1 * cell_size),
            end: (self.end.0 * cell_size, self.end.1 * cell_size),
        }
    }
}

pub const fn angle_degrees(direction: Direction) -> f32 {
    match direction {
        Direction::Horizontal => 0.0,
        Direction::Vertical => 90.0,
        Direction::DiagonalDown => 45.0,
        Direction::DiagonalUp => -45.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn line_on(cells: &[Coord2]) -> WinningLine {
        let mut board: Array2<Cell> = Array2::default((15, 15).to_nd_index());
        for &coords in cells {
            board[coords.to_nd_index()] = Cell::Stone(Player::P1);
        }
        find_winning_line(&board, cells[0], 5).unwrap()
    }

    #[test]
    fn horizontal_geometry_spans_whole_cells() {
        let line = line_on(&[(10, 3), (10, 4), (10, 5), (10, 6), (10, 7)]);

        let geometry = line.geometry();

        assert_eq!(geometry.angle_degrees, 0.0);
        assert_eq!(geometry.length, 5.0);
        assert_eq!(geometry.start, (3.5, 10.5));
        assert_eq!(geometry.end, (7.5, 10.5));
        assert_eq!(geometry.scaled(40.0).length, 200.0);
    }

    #[test]
    fn diagonal_geometry_is_rotated_and_stretched() {
        let line = line_on(&[(2, 12), (3, 11), (4, 10), (5, 9), (6, 8)]);

        let geometry = line.geometry();

        assert_eq!(geometry.angle_degrees, -45.0);
        assert!((geometry.length - 5.0 * SQRT_2).abs() < 1e-5);
        assert_eq!(geometry.start, (12.5, 2.5));
        assert_eq!(geometry.end, (8.5, 6.5));
    }
}
