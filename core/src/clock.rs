use alloc::{format, string::String};
use serde::{Deserialize, Serialize};

use crate::*;

/// Remaining time on every countdown at one instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReadings {
    pub p1: Seconds,
    pub p2: Seconds,
    pub inactivity: Seconds,
}

impl ClockReadings {
    pub const fn player(&self, player: Player) -> Seconds {
        match player {
            Player::P1 => self.p1,
            Player::P2 => self.p2,
        }
    }

    fn player_mut(&mut self, player: Player) -> &mut Seconds {
        match player {
            Player::P1 => &mut self.p1,
            Player::P2 => &mut self.p2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// The mover's own clock reached zero.
    Clock,
    /// Nobody moved before the inactivity clock reached zero.
    Inactivity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockTick {
    /// Paused or stopped, nothing moved.
    Idle,
    Running,
    Expired(Expiry),
}

/// Per-player countdowns plus the shared inactivity countdown.
///
/// `paused` is the external toggle, `stopped` is set once the match is decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clocks {
    clock_budget: Seconds,
    inactivity_budget: Seconds,
    readings: ClockReadings,
    paused: bool,
    stopped: bool,
}

impl Clocks {
    pub fn new(clock_budget: Seconds, inactivity_budget: Seconds) -> Self {
        Self {
            clock_budget,
            inactivity_budget,
            readings: ClockReadings {
                p1: clock_budget,
                p2: clock_budget,
                inactivity: inactivity_budget,
            },
            paused: false,
            stopped: false,
        }
    }

    pub fn readings(&self) -> ClockReadings {
        self.readings
    }

    pub fn remaining(&self, player: Player) -> Seconds {
        self.readings.player(player)
    }

    pub fn inactivity(&self) -> Seconds {
        self.readings.inactivity
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.stopped
    }

    /// Returns whether the flag changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Restores full budgets. The pause flag is left alone.
    pub fn reset(&mut self) {
        self.readings = ClockReadings {
            p1: self.clock_budget,
            p2: self.clock_budget,
            inactivity: self.inactivity_budget,
        };
        self.stopped = false;
    }

    /// Puts back readings captured earlier and resumes ticking.
    pub fn restore(&mut self, readings: ClockReadings) {
        self.readings = readings;
        self.stopped = false;
    }

    pub fn note_move(&mut self) {
        self.readings.inactivity = self.inactivity_budget;
    }

    pub fn tick(&mut self, mover: Player) -> ClockTick {
        if !self.is_running() {
            return ClockTick::Idle;
        }

        let own = self.readings.player_mut(mover);
        *own = own.saturating_sub(1);
        let own = *own;
        self.readings.inactivity = self.readings.inactivity.saturating_sub(1);

        if own == 0 {
            self.stop();
            ClockTick::Expired(Expiry::Clock)
        } else if self.readings.inactivity == 0 {
            self.stop();
            ClockTick::Expired(Expiry::Inactivity)
        } else {
            ClockTick::Running
        }
    }
}

/// Formats seconds as `mm:ss`; minutes keep growing past 99.
pub fn format_clock(seconds: Seconds) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
