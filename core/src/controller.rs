use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What happened while time was advanced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// Whole seconds that elapsed.
    pub ticks: u32,
    /// The tick that ended the match on time, if any.
    pub timed_out: bool,
    /// Deferred events that were applied, in firing order.
    pub fired: Vec<DeferredAction>,
}

/// Owns a [`MatchEngine`] and the timeline of its deferred feedback.
///
/// The host only reports elapsed time through [`advance`](Self::advance) (or calls
/// [`tick`](Self::tick) once a second); the controller turns it into clock ticks and fires
/// deferred events when they fall due. Pending events die with the controller.
#[derive(Debug)]
pub struct Controller {
    engine: MatchEngine,
    timeline: Timeline,
    since_tick: Duration,
}

impl Controller {
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: MatchEngine::new(config),
            timeline: Timeline::default(),
            since_tick: Duration::ZERO,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn view(&self) -> MatchView {
        MatchView::from_engine(&self.engine)
    }

    pub fn pending(&self) -> usize {
        self.timeline.len()
    }

    pub fn reset(&mut self, board_size: Coord) {
        self.engine.reset(board_size);
        self.since_tick = Duration::ZERO;
        let dropped = self.timeline.cancel_all();
        if dropped > 0 {
            log::trace!("Reset dropped {} pending events", dropped);
        }
        self.collect();
    }

    pub fn attempt_move(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let result = self.engine.attempt_move(coords);
        self.collect();
        result
    }

    pub fn undo(&mut self) -> UndoOutcome {
        let outcome = self.engine.undo();
        self.collect();
        outcome
    }

    pub fn set_paused(&mut self, paused: bool) -> bool {
        self.engine.set_paused(paused)
    }

    pub fn tick(&mut self) -> Advance {
        self.advance(TICK_INTERVAL)
    }

    /// Moves time forward by `elapsed`, interleaving clock ticks and deferred events in order.
    ///
    /// While the clocks are paused or stopped the tick phase is frozen and time only moves
    /// the timeline, so the cost is bounded by the number of pending events.
    pub fn advance(&mut self, mut elapsed: Duration) -> Advance {
        let mut report = Advance::default();

        loop {
            let ticking = !self.engine.is_paused() && !self.engine.is_finished();
            let to_tick = if ticking {
                TICK_INTERVAL.saturating_sub(self.since_tick)
            } else {
                Duration::MAX
            };
            let to_event = self.timeline.next_due().unwrap_or(Duration::MAX);
            let step = to_tick.min(to_event);

            if step > elapsed {
                if ticking {
                    self.since_tick += elapsed;
                }
                self.timeline.advance(elapsed);
                break;
            }

            elapsed -= step;
            if ticking {
                self.since_tick += step;
            }

            for deferred in self.timeline.advance(step) {
                if self.engine.apply_deferred(&deferred) {
                    report.fired.push(deferred.action);
                }
            }

            if ticking && self.since_tick >= TICK_INTERVAL {
                self.since_tick = Duration::ZERO;
                let outcome = self.engine.tick();
                if outcome.has_update() {
                    report.ticks = report.ticks.saturating_add(1);
                }
                if outcome == TickOutcome::TimedOut {
                    report.timed_out = true;
                }
                self.collect();
            }
        }

        report
    }

    /// Cancels everything still scheduled. Returns how many events were dropped.
    pub fn shutdown(mut self) -> usize {
        self.collect();
        let dropped = self.timeline.cancel_all();
        log::debug!("Controller shut down, {} pending events cancelled", dropped);
        dropped
    }

    fn collect(&mut self) {
        for deferred in self.engine.drain_deferred() {
            log::trace!("Scheduling {:?} in {:?}", deferred.action, deferred.delay);
            self.timeline.schedule(deferred);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
