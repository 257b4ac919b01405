use thiserror::Error;

/// Reasons a move is rejected. None of them change the board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("Clocks are paused, no new moves are accepted")]
    Paused,
    #[error("Cell is already occupied")]
    Occupied,
    #[error("Cell is too far from existing play")]
    InvalidPlacement,
}

pub type Result<T> = core::result::Result<T, GameError>;
