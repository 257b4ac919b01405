use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for move counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Whole seconds left on a countdown.
pub type Seconds = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Chebyshev (king-move) distance between two cells.
pub const fn chebyshev(a: Coord2, b: Coord2) -> Coord {
    let rows = a.0.abs_diff(b.0);
    let cols = a.1.abs_diff(b.1);
    if rows > cols { rows } else { cols }
}

/// The four undirected line directions, in the order win detection checks them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Self::Horizontal,
        Self::Vertical,
        Self::DiagonalDown,
        Self::DiagonalUp,
    ];

    /// Positive step as `(d_row, d_col)`.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::DiagonalDown => (1, 1),
            Self::DiagonalUp => (1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(self, Self::DiagonalDown | Self::DiagonalUp)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains on a `size` x `size` board.
fn apply_delta(coords: Coord2, delta: (isize, isize), size: Coord) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= size {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= size {
        return None;
    }

    Some((next_row, next_col))
}

/// Walks from `origin` (exclusive) in steps of `delta` until the board edge.
#[derive(Debug)]
pub struct RayIter {
    cursor: Coord2,
    delta: (isize, isize),
    size: Coord,
}

impl RayIter {
    pub fn new(origin: Coord2, delta: (isize, isize), size: Coord) -> Self {
        Self {
            cursor: origin,
            delta,
            size,
        }
    }
}

impl Iterator for RayIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let next = apply_delta(self.cursor, self.delta, self.size)?;
        self.cursor = next;
        Some(next)
    }
}

/// Every on-board cell within Chebyshev distance `radius` of `center`, including `center`.
pub fn iter_window(center: Coord2, radius: Coord, size: Coord) -> impl Iterator<Item = Coord2> {
    let row_start = center.0.saturating_sub(radius);
    let row_end = center.0.saturating_add(radius).min(size.saturating_sub(1));
    let col_start = center.1.saturating_sub(radius);
    let col_end = center.1.saturating_add(radius).min(size.saturating_sub(1));

    (row_start..=row_end).flat_map(move |row| (col_start..=col_end).map(move |col| (row, col)))
}
