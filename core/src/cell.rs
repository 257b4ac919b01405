use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }
}

/// Contents of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Stone(Player),
    /// A stone that belongs to the completed winning line.
    Winning(Player),
}

impl Cell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn owner(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::Stone(player) | Self::Winning(player) => Some(player),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}
