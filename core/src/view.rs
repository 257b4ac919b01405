use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of everything a renderer needs from a [`MatchEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub size: Coord,
    pub board: Array2<Cell>,
    pub mover: Player,
    pub move_count: CellCount,
    pub last_move: Option<Coord2>,
    pub outcome: Option<GameOutcome>,
    pub winning_line: Option<WinningLine>,
    pub line_geometry: Option<LineGeometry>,
    pub clocks: ClockReadings,
    pub history_depth: usize,
    pub paused: bool,
    pub flash: Option<Coord2>,
    pub announced: bool,
}

impl MatchView {
    pub fn from_engine(engine: &MatchEngine) -> Self {
        let winning_line = engine.winning_line().cloned();
        let line_geometry = winning_line.as_ref().map(WinningLine::geometry);

        Self {
            size: engine.size(),
            board: engine.board().clone(),
            mover: engine.mover(),
            move_count: engine.move_count(),
            last_move: engine.last_move(),
            outcome: engine.outcome(),
            winning_line,
            line_geometry,
            clocks: engine.clocks(),
            history_depth: engine.history_depth(),
            paused: engine.is_paused(),
            flash: engine.flash(),
            announced: engine.is_announced(),
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    /// Rows top to bottom, for renderers that walk the board line by line.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Cell> + '_> + '_ {
        self.board.rows().into_iter().map(|row| row.into_iter().copied())
    }
}
