use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub type LineCells = SmallVec<[Coord2; 9]>;

/// A completed run of same-player stones, ordered along its direction.
///
/// Horizontal lines are ordered by ascending column, every other direction by ascending row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinningLine {
    player: Player,
    direction: Direction,
    cells: LineCells,
}

impl WinningLine {
    pub fn player(&self) -> Player {
        self.player
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn geometry(&self) -> LineGeometry {
        LineGeometry::of(self)
    }
}

/// Looks for a run of at least `win_length` stones through `origin`.
///
/// Directions are checked in [`Direction::ALL`] order and the first match is returned.
/// The whole contiguous run is reported, even when it is longer than `win_length`.
pub fn find_winning_line(
    board: &Array2<Cell>,
    origin: Coord2,
    win_length: Coord,
) -> Option<WinningLine> {
    let player = board.get(origin.to_nd_index())?.owner()?;
    let size = Coord::try_from(board.nrows()).unwrap_or(Coord::MAX);

    Direction::ALL.into_iter().find_map(|direction| {
        let cells = collect_run(board, origin, direction, player, size);
        log::trace!(
            "{:?} run through {:?}: {} stones",
            direction,
            origin,
            cells.len()
        );
        (cells.len() >= usize::from(win_length)).then_some(WinningLine {
            player,
            direction,
            cells,
        })
    })
}

fn collect_run(
    board: &Array2<Cell>,
    origin: Coord2,
    direction: Direction,
    player: Player,
    size: Coord,
) -> LineCells {
    let (d_row, d_col) = direction.delta();
    let owned_by_player = |pos: &Coord2| board[pos.to_nd_index()].owner() == Some(player);

    let mut cells: LineCells = RayIter::new(origin, (-d_row, -d_col), size)
        .take_while(owned_by_player)
        .collect();
    cells.reverse();
    cells.push(origin);
    cells.extend(RayIter::new(origin, (d_row, d_col), size).take_while(owned_by_player));
    cells
}
