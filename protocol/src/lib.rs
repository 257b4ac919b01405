//! JSON messages between a host (terminal, browser, test harness) and a match
//! [`Controller`](morpion_core::Controller).

use morpion_core::{Coord, GameError, GameOutcome, MatchView, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use session::*;

mod session;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start over, optionally on a different board size.
    Reset {
        #[serde(default)]
        board_size: Option<Coord>,
    },
    Move {
        row: Coord,
        col: Coord,
    },
    Undo,
    SetPaused {
        paused: bool,
    },
    /// One second of clock time.
    Tick,
    /// Arbitrary elapsed time, for hosts that poll faster than once a second.
    Advance {
        millis: u64,
    },
    View,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Accepted {
        row: Coord,
        col: Coord,
        player: Player,
        finished: bool,
    },
    Rejected {
        row: Coord,
        col: Coord,
        reason: RejectReason,
    },
    Undone {
        applied: bool,
    },
    Paused {
        paused: bool,
    },
    Ticked {
        ticks: u32,
        timed_out: bool,
    },
    Announce {
        outcome: GameOutcome,
    },
    FlashCleared {
        row: Coord,
        col: Coord,
    },
    View {
        view: Box<MatchView>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Occupied,
    GameOver,
    InvalidPlacement,
    Paused,
    InvalidCoords,
}

impl From<GameError> for RejectReason {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Occupied => Self::Occupied,
            GameError::GameOver => Self::GameOver,
            GameError::InvalidPlacement => Self::InvalidPlacement,
            GameError::Paused => Self::Paused,
            GameError::InvalidCoords => Self::InvalidCoords,
        }
    }
}

pub fn decode(line: &str) -> Result<ClientMessage> {
    Ok(serde_json::from_str(line)?)
}

pub fn encode(message: &ServerMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}
