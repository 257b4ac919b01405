use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Engine state captured right before a move is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) board: Array2<Cell>,
    pub(crate) mover: Player,
    pub(crate) move_count: CellCount,
    pub(crate) last_move: Option<Coord2>,
    pub(crate) clocks: ClockReadings,
}

/// Undo stack. There is no redo: popped entries are gone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
