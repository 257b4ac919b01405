#![no_std]

extern crate alloc;

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use clock::*;
pub use controller::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use history::*;
pub use rules::*;
pub use schedule::*;
pub use types::*;
pub use view::*;

mod cell;
mod clock;
mod controller;
mod engine;
mod error;
mod geometry;
mod history;
mod rules;
mod schedule;
mod types;
mod view;

pub const MAX_BOARD_SIZE: Coord = 64;
pub const DEFAULT_BOARD_SIZE: Coord = 15;
pub const DEFAULT_CLOCK_BUDGET: Seconds = 300;
pub const DEFAULT_INACTIVITY_BUDGET: Seconds = 15;
pub const DEFAULT_OPENING_RADIUS: Coord = 3;
pub const DEFAULT_PROXIMITY_RADIUS: Coord = 2;
pub const DEFAULT_WIN_LENGTH: Coord = 5;
pub const DEFAULT_ANNOUNCE_DELAY_MS: u32 = 1500;
pub const DEFAULT_FLASH_DELAY_MS: u32 = 500;

/// Tunables of a match. Missing fields deserialize to their defaults.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: Coord,
    /// Per-player clock budget.
    pub clock_budget: Seconds,
    /// Shared budget for making the next move.
    pub inactivity_budget: Seconds,
    /// Chebyshev radius around the center allowed for the opening reply.
    pub opening_radius: Coord,
    /// Chebyshev radius around existing stones allowed for later moves.
    pub proximity_radius: Coord,
    pub win_length: Coord,
    pub announce_delay_ms: u32,
    pub flash_delay_ms: u32,
}

impl GameConfig {
    pub fn new(board_size: Coord) -> Self {
        Self {
            board_size,
            ..Default::default()
        }
        .normalized()
    }

    /// Clamps every field into its supported range.
    pub fn normalized(self) -> Self {
        let board_size = self.board_size.clamp(1, MAX_BOARD_SIZE);
        if board_size != self.board_size {
            log::warn!(
                "Board size {} out of range, clamped to {}",
                self.board_size,
                board_size
            );
        }

        let win_length = self.win_length.max(1);
        if win_length != self.win_length {
            log::warn!("Win length must be at least 1, using {}", win_length);
        }

        Self {
            board_size,
            clock_budget: self.clock_budget.max(1),
            inactivity_budget: self.inactivity_budget.max(1),
            win_length,
            ..self
        }
    }

    pub const fn center(&self) -> Coord2 {
        (self.board_size / 2, self.board_size / 2)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.board_size, self.board_size)
    }

    pub const fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms as u64)
    }

    pub const fn flash_delay(&self) -> Duration {
        Duration::from_millis(self.flash_delay_ms as u64)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            clock_budget: DEFAULT_CLOCK_BUDGET,
            inactivity_budget: DEFAULT_INACTIVITY_BUDGET,
            opening_radius: DEFAULT_OPENING_RADIUS,
            proximity_radius: DEFAULT_PROXIMITY_RADIUS,
            win_length: DEFAULT_WIN_LENGTH,
            announce_delay_ms: DEFAULT_ANNOUNCE_DELAY_MS,
            flash_delay_ms: DEFAULT_FLASH_DELAY_MS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// Completed a line of at least `win_length` stones.
    Line,
    /// The loser's own clock ran out.
    ClockExpired,
    /// The loser did not move before the inactivity clock ran out.
    Inactivity,
}

/// Terminal result of a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won { winner: Player, reason: WinReason },
    Draw,
}

impl GameOutcome {
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Won { winner, .. } => Some(winner),
            Self::Draw => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Placed,
    Won,
    Drawn,
}

impl MoveOutcome {
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Placed => false,
            Self::Won => true,
            Self::Drawn => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    NoChange,
    Reverted,
}

impl UndoOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Reverted => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Ticked,
    TimedOut,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            NoChange => false,
            Ticked => true,
            TimedOut => true,
        }
    }
}
