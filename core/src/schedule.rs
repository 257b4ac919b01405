use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Surface the finished match to the player.
    AnnounceOutcome,
    /// Drop the invalid-placement highlight from a cell.
    ClearFlash(Coord2),
}

/// Feedback the engine wants applied after `delay`.
///
/// `epoch` ties it to the engine state that produced it; reset, undo and every invalid
/// placement start a new epoch, which turns older events into no-ops.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Deferred {
    pub epoch: u32,
    pub delay: Duration,
    pub action: DeferredAction,
}

/// Virtual clock holding deferred events until they fall due.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now: Duration,
    queue: Vec<(Duration, Deferred)>,
}

impl Timeline {
    pub fn schedule(&mut self, deferred: Deferred) {
        let due = self.now.saturating_add(deferred.delay);
        // keep the queue sorted by due time, ties in insertion order
        let index = self.queue.partition_point(|&(at, _)| at <= due);
        self.queue.insert(index, (due, deferred));
    }

    /// Time left until the earliest pending event.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .first()
            .map(|&(due, _)| due.saturating_sub(self.now))
    }

    /// Moves time forward and returns every event that fell due, earliest first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Deferred> {
        self.now = self.now.saturating_add(elapsed);
        let ready = self.queue.partition_point(|&(due, _)| due <= self.now);
        self.queue
            .drain(..ready)
            .map(|(_, deferred)| deferred)
            .collect()
    }

    /// Drops every pending event, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
