use ndarray::Array2;

use crate::*;

/// Checks that `coords` is close enough to existing play.
///
/// The reply to the auto-placed center stone (`move_count == 1`) must land within
/// `opening_radius` of the center. Every later move must land within `proximity_radius`
/// of some stone already on the board.
pub fn check_placement(
    board: &Array2<Cell>,
    coords: Coord2,
    move_count: CellCount,
    config: &GameConfig,
) -> Result<()> {
    let allowed = if move_count == 1 {
        chebyshev(coords, config.center()) <= config.opening_radius
    } else {
        has_stone_within(board, coords, config.proximity_radius)
    };

    if allowed {
        Ok(())
    } else {
        Err(GameError::InvalidPlacement)
    }
}

pub fn has_stone_within(board: &Array2<Cell>, coords: Coord2, radius: Coord) -> bool {
    let size = Coord::try_from(board.nrows()).unwrap_or(Coord::MAX);
    iter_window(coords, radius, size).any(|pos| !board[pos.to_nd_index()].is_empty())
}
