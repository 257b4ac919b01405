use alloc::vec::Vec;
use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// State machine for one five-in-a-row match.
///
/// Mutated only through [`reset`](Self::reset), [`attempt_move`](Self::attempt_move),
/// [`undo`](Self::undo), [`set_paused`](Self::set_paused), [`tick`](Self::tick) and
/// [`apply_deferred`](Self::apply_deferred). Deferred feedback is queued internally and
/// handed to the host through [`drain_deferred`](Self::drain_deferred).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    config: GameConfig,
    board: Array2<Cell>,
    mover: Player,
    move_count: CellCount,
    last_move: Option<Coord2>,
    outcome: Option<GameOutcome>,
    winning_line: Option<WinningLine>,
    clocks: Clocks,
    history: History,
    flash: Option<Coord2>,
    announced: bool,
    epoch: u32,
    #[serde(skip)]
    pending: Vec<Deferred>,
}

impl MatchEngine {
    pub fn new(config: GameConfig) -> Self {
        let config = config.normalized();
        let mut engine = Self {
            config,
            board: Array2::default((config.board_size, config.board_size).to_nd_index()),
            mover: Player::P2,
            move_count: 0,
            last_move: None,
            outcome: None,
            winning_line: None,
            clocks: Clocks::new(config.clock_budget, config.inactivity_budget),
            history: History::default(),
            flash: None,
            announced: false,
            epoch: 0,
            pending: Vec::new(),
        };
        engine.restart();
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord {
        self.config.board_size
    }

    pub fn board(&self) -> &Array2<Cell> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn mover(&self) -> Player {
        self.mover
    }

    pub fn move_count(&self) -> CellCount {
        self.move_count
    }

    pub fn last_move(&self) -> Option<Coord2> {
        self.last_move
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(GameOutcome::winner)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    pub fn clocks(&self) -> ClockReadings {
        self.clocks.readings()
    }

    pub fn remaining(&self, player: Player) -> Seconds {
        self.clocks.remaining(player)
    }

    pub fn inactivity_remaining(&self) -> Seconds {
        self.clocks.inactivity()
    }

    pub fn is_paused(&self) -> bool {
        self.clocks.is_paused()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Cell highlighted after an invalid placement, until its deferred clear fires.
    pub fn flash(&self) -> Option<Coord2> {
        self.flash
    }

    /// Whether the outcome announcement delay has elapsed.
    pub fn is_announced(&self) -> bool {
        self.announced
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Starts a fresh match on a `board_size` board, keeping the other tunables.
    pub fn reset(&mut self, board_size: Coord) {
        let config = GameConfig {
            board_size,
            ..self.config
        }
        .normalized();
        self.config = config;
        self.restart();
    }

    pub fn attempt_move(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_in_progress()?;
        if self.clocks.is_paused() {
            return Err(GameError::Paused);
        }
        if !self.cell_at(coords).is_empty() {
            return Err(GameError::Occupied);
        }
        if let Err(err) = check_placement(&self.board, coords, self.move_count, &self.config) {
            log::debug!("Rejected placement at {:?} on move {}", coords, self.move_count);
            self.raise_flash(coords);
            return Err(err);
        }

        let snapshot = self.snapshot();
        self.history.push(snapshot);

        let player = self.mover;
        self.board[coords.to_nd_index()] = Cell::Stone(player);
        self.last_move = Some(coords);
        self.move_count += 1;
        self.flash = None;
        self.clocks.note_move();
        log::debug!("{:?} placed at {:?}, move {}", player, coords, self.move_count);

        if let Some(line) = find_winning_line(&self.board, coords, self.config.win_length) {
            for &pos in line.cells() {
                self.board[pos.to_nd_index()] = Cell::Winning(player);
            }
            log::debug!("{:?} completed a {:?} line", player, line.direction());
            self.winning_line = Some(line);
            self.finish(
                GameOutcome::Won {
                    winner: player,
                    reason: WinReason::Line,
                },
                self.config.announce_delay(),
            );
            return Ok(MoveOutcome::Won);
        }

        if self.is_board_full() {
            self.finish(GameOutcome::Draw, self.config.announce_delay());
            return Ok(MoveOutcome::Drawn);
        }

        self.mover = player.opponent();
        Ok(MoveOutcome::Placed)
    }

    pub fn undo(&mut self) -> UndoOutcome {
        let Some(snapshot) = self.history.pop() else {
            return UndoOutcome::NoChange;
        };

        let Snapshot {
            board,
            mover,
            move_count,
            last_move,
            clocks,
        } = snapshot;
        self.board = board;
        self.mover = mover;
        self.move_count = move_count;
        self.last_move = last_move;
        self.clocks.restore(clocks);
        self.outcome = None;
        self.winning_line = None;
        self.flash = None;
        self.announced = false;
        self.start_epoch();

        log::debug!("Undo back to move {}", self.move_count);
        UndoOutcome::Reverted
    }

    /// Returns whether the pause flag changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        let changed = self.clocks.set_paused(paused);
        if changed {
            log::debug!("Clocks {}", if paused { "paused" } else { "resumed" });
        }
        changed
    }

    /// Advances every running countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_finished() {
            return TickOutcome::NoChange;
        }

        match self.clocks.tick(self.mover) {
            ClockTick::Idle => TickOutcome::NoChange,
            ClockTick::Running => {
                log::trace!(
                    "{:?} has {}s, inactivity {}s",
                    self.mover,
                    self.clocks.remaining(self.mover),
                    self.clocks.inactivity()
                );
                TickOutcome::Ticked
            }
            ClockTick::Expired(expiry) => {
                let reason = match expiry {
                    Expiry::Clock => WinReason::ClockExpired,
                    Expiry::Inactivity => WinReason::Inactivity,
                };
                log::debug!("{:?} lost on time ({:?})", self.mover, reason);
                self.finish(
                    GameOutcome::Won {
                        winner: self.mover.opponent(),
                        reason,
                    },
                    Duration::ZERO,
                );
                TickOutcome::TimedOut
            }
        }
    }

    /// Hands over deferred events queued since the last call.
    pub fn drain_deferred(&mut self) -> Vec<Deferred> {
        core::mem::take(&mut self.pending)
    }

    /// Applies a deferred event that fell due. Returns `false` for stale events.
    pub fn apply_deferred(&mut self, deferred: &Deferred) -> bool {
        if deferred.epoch != self.epoch {
            log::debug!(
                "Dropping stale {:?} from epoch {}",
                deferred.action,
                deferred.epoch
            );
            return false;
        }

        match deferred.action {
            DeferredAction::AnnounceOutcome if self.is_finished() && !self.announced => {
                self.announced = true;
                true
            }
            DeferredAction::ClearFlash(coords) if self.flash == Some(coords) => {
                self.flash = None;
                true
            }
            _ => false,
        }
    }

    fn restart(&mut self) {
        let size = self.config.board_size;
        self.board = Array2::default((size, size).to_nd_index());
        self.board[self.config.center().to_nd_index()] = Cell::Stone(Player::P1);
        self.mover = Player::P2;
        self.move_count = 1;
        self.last_move = Some(self.config.center());
        self.outcome = None;
        self.winning_line = None;
        self.clocks.reset();
        self.history.clear();
        self.flash = None;
        self.announced = false;
        self.start_epoch();

        log::debug!("New {}x{} match", size, size);

        if self.is_board_full() {
            self.finish(GameOutcome::Draw, Duration::ZERO);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            mover: self.mover,
            move_count: self.move_count,
            last_move: self.last_move,
            clocks: self.clocks.readings(),
        }
    }

    fn finish(&mut self, outcome: GameOutcome, announce_after: Duration) {
        self.outcome = Some(outcome);
        self.clocks.stop();
        self.pending.push(Deferred {
            epoch: self.epoch,
            delay: announce_after,
            action: DeferredAction::AnnounceOutcome,
        });
    }

    /// A new flash supersedes any earlier one, so their pending clears go stale.
    fn raise_flash(&mut self, coords: Coord2) {
        self.start_epoch();
        self.flash = Some(coords);
        self.pending.push(Deferred {
            epoch: self.epoch,
            delay: self.config.flash_delay(),
            action: DeferredAction::ClearFlash(coords),
        });
    }

    fn start_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pending.clear();
    }

    fn is_board_full(&self) -> bool {
        self.move_count >= self.config.total_cells()
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.config.board_size;
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord) -> MatchEngine {
        MatchEngine::new(GameConfig::new(size))
    }

    fn play(engine: &mut MatchEngine, moves: &[Coord2]) {
        for &coords in moves {
            engine.attempt_move(coords).unwrap();
        }
    }

    #[test]
    fn reset_places_center_stone_and_hands_turn_to_p2() {
        let engine = engine(15);

        assert_eq!(engine.cell_at((7, 7)), Cell::Stone(Player::P1));
        assert_eq!(engine.mover(), Player::P2);
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.history_depth(), 0);
        assert_eq!(engine.outcome(), None);
        assert_eq!(engine.remaining(Player::P1), DEFAULT_CLOCK_BUDGET);
        assert_eq!(engine.remaining(Player::P2), DEFAULT_CLOCK_BUDGET);
        assert_eq!(engine.inactivity_remaining(), DEFAULT_INACTIVITY_BUDGET);
    }

    #[test]
    fn reset_twice_yields_identical_state() {
        let mut engine = engine(15);
        play(&mut engine, &[(6, 6), (6, 7)]);
        engine.tick();

        engine.reset(15);
        let first = engine.clone();
        engine.reset(15);

        assert_eq!(engine.board(), first.board());
        assert_eq!(engine.mover(), first.mover());
        assert_eq!(engine.move_count(), first.move_count());
        assert_eq!(engine.last_move(), first.last_move());
        assert_eq!(engine.clocks(), first.clocks());
        assert_eq!(engine.history_depth(), 0);
        assert_eq!(engine.outcome(), None);
    }

    #[test]
    fn reset_can_change_board_size() {
        let mut engine = engine(15);

        engine.reset(9);

        assert_eq!(engine.size(), 9);
        assert_eq!(engine.cell_at((4, 4)), Cell::Stone(Player::P1));
        assert_eq!(engine.attempt_move((9, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let mut engine = engine(15);
        let before = engine.clone();

        assert_eq!(engine.attempt_move((7, 7)), Err(GameError::Occupied));
        assert_eq!(engine.attempt_move((15, 2)), Err(GameError::InvalidCoords));
        assert_eq!(engine, before);

        engine.set_paused(true);
        assert_eq!(engine.attempt_move((6, 6)), Err(GameError::Paused));
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.history_depth(), 0);
    }

    #[test]
    fn opening_reply_is_limited_to_center_window() {
        let mut engine = engine(15);

        assert_eq!(
            engine.attempt_move((11, 7)),
            Err(GameError::InvalidPlacement)
        );
        assert_eq!(
            engine.attempt_move((7, 3)),
            Err(GameError::InvalidPlacement)
        );
        assert_eq!(engine.attempt_move((10, 4)), Ok(MoveOutcome::Placed));
    }

    #[test]
    fn invalid_placement_raises_a_flash_cleared_later() {
        let mut engine = engine(15);

        assert_eq!(engine.attempt_move((0, 0)), Err(GameError::InvalidPlacement));
        assert_eq!(engine.flash(), Some((0, 0)));
        assert_eq!(engine.move_count(), 1);

        let pending = engine.drain_deferred();
        assert_eq!(
            pending,
            [Deferred {
                epoch: engine.epoch(),
                delay: Duration::from_millis(500),
                action: DeferredAction::ClearFlash((0, 0)),
            }]
        );
        assert!(engine.apply_deferred(&pending[0]));
        assert_eq!(engine.flash(), None);
    }

    #[test]
    fn turns_alternate_after_each_non_winning_move() {
        let mut engine = engine(15);
        let moves = [(6, 6), (6, 7), (8, 8), (5, 5)];
        let mut expected = Player::P2;

        for coords in moves {
            assert_eq!(engine.mover(), expected);
            assert_eq!(engine.attempt_move(coords), Ok(MoveOutcome::Placed));
            assert_eq!(engine.cell_at(coords), Cell::Stone(expected));
            expected = expected.opponent();
        }
        assert_eq!(engine.move_count(), 5);
        assert_eq!(engine.history_depth(), 4);
    }

    #[test]
    fn move_resets_inactivity_clock() {
        let mut engine = engine(15);
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(engine.inactivity_remaining(), DEFAULT_INACTIVITY_BUDGET - 5);
        assert_eq!(engine.remaining(Player::P2), DEFAULT_CLOCK_BUDGET - 5);
        assert_eq!(engine.remaining(Player::P1), DEFAULT_CLOCK_BUDGET);

        engine.attempt_move((6, 6)).unwrap();

        assert_eq!(engine.inactivity_remaining(), DEFAULT_INACTIVITY_BUDGET);
        engine.tick();
        assert_eq!(engine.remaining(Player::P1), DEFAULT_CLOCK_BUDGET - 1);
        assert_eq!(engine.remaining(Player::P2), DEFAULT_CLOCK_BUDGET - 5);
    }

    #[test]
    fn winning_move_marks_line_and_keeps_mover() {
        let mut engine = engine(15);
        // P1 builds row 7 from the center, P2 answers on row 8
        play(
            &mut engine,
            &[(8, 7), (7, 8), (8, 8), (7, 9), (8, 9), (7, 10), (8, 10)],
        );

        assert_eq!(engine.attempt_move((7, 11)), Ok(MoveOutcome::Won));

        assert_eq!(engine.mover(), Player::P1);
        assert_eq!(
            engine.outcome(),
            Some(GameOutcome::Won {
                winner: Player::P1,
                reason: WinReason::Line,
            })
        );
        let line = engine.winning_line().unwrap();
        assert_eq!(line.cells(), &[(7, 7), (7, 8), (7, 9), (7, 10), (7, 11)]);
        for &coords in line.cells() {
            assert_eq!(engine.cell_at(coords), Cell::Winning(Player::P1));
        }
        assert_eq!(engine.cell_at((8, 7)), Cell::Stone(Player::P2));
        assert_eq!(engine.attempt_move((6, 7)), Err(GameError::GameOver));
    }

    #[test]
    fn clocks_stop_once_the_match_is_decided() {
        let mut engine = engine(15);
        play(
            &mut engine,
            &[(8, 7), (7, 8), (8, 8), (7, 9), (8, 9), (7, 10), (8, 10), (7, 11)],
        );
        let frozen = engine.clocks();

        assert_eq!(engine.tick(), TickOutcome::NoChange);
        assert_eq!(engine.clocks(), frozen);
    }

    #[test]
    fn win_announcement_is_deferred() {
        let mut engine = engine(15);
        play(
            &mut engine,
            &[(8, 7), (7, 8), (8, 8), (7, 9), (8, 9), (7, 10), (8, 10), (7, 11)],
        );

        assert!(!engine.is_announced());
        let pending = engine.drain_deferred();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].delay, Duration::from_millis(1500));
        assert_eq!(pending[0].action, DeferredAction::AnnounceOutcome);

        assert!(engine.apply_deferred(&pending[0]));
        assert!(engine.is_announced());
        assert!(!engine.apply_deferred(&pending[0]));
    }

    #[test]
    fn player_clock_expiry_loses_for_the_mover() {
        let mut engine = MatchEngine::new(GameConfig {
            clock_budget: 3,
            inactivity_budget: 10,
            ..GameConfig::default()
        });

        assert_eq!(engine.tick(), TickOutcome::Ticked);
        assert_eq!(engine.tick(), TickOutcome::Ticked);
        assert_eq!(engine.tick(), TickOutcome::TimedOut);

        assert_eq!(
            engine.outcome(),
            Some(GameOutcome::Won {
                winner: Player::P1,
                reason: WinReason::ClockExpired,
            })
        );
        assert_eq!(engine.remaining(Player::P2), 0);
        assert_eq!(engine.tick(), TickOutcome::NoChange);
        assert_eq!(engine.inactivity_remaining(), 7);
    }

    #[test]
    fn inactivity_expiry_loses_for_the_mover() {
        let mut engine = MatchEngine::new(GameConfig {
            inactivity_budget: 2,
            ..GameConfig::default()
        });
        engine.attempt_move((6, 6)).unwrap();

        engine.tick();
        assert_eq!(engine.tick(), TickOutcome::TimedOut);

        assert_eq!(engine.winner(), Some(Player::P2));
        assert_eq!(
            engine.outcome(),
            Some(GameOutcome::Won {
                winner: Player::P2,
                reason: WinReason::Inactivity,
            })
        );
        assert_eq!(engine.drain_deferred()[0].delay, Duration::ZERO);
    }

    #[test]
    fn paused_clocks_do_not_tick() {
        let mut engine = engine(15);
        engine.set_paused(true);

        assert_eq!(engine.tick(), TickOutcome::NoChange);
        assert_eq!(engine.remaining(Player::P2), DEFAULT_CLOCK_BUDGET);

        engine.set_paused(false);
        assert_eq!(engine.tick(), TickOutcome::Ticked);
    }

    #[test]
    fn undo_restores_pre_move_state_exactly() {
        let mut engine = engine(15);
        engine.tick();
        engine.tick();
        let before = engine.clone();

        engine.attempt_move((6, 6)).unwrap();
        engine.tick();
        assert_eq!(engine.undo(), UndoOutcome::Reverted);

        assert_eq!(engine.board(), before.board());
        assert_eq!(engine.mover(), before.mover());
        assert_eq!(engine.move_count(), before.move_count());
        assert_eq!(engine.last_move(), before.last_move());
        assert_eq!(engine.clocks(), before.clocks());
        assert_eq!(engine.history_depth(), 0);
    }

    #[test]
    fn repeated_undo_walks_back_to_fresh_state() {
        let mut engine = engine(15);
        let fresh = engine.clone();
        play(&mut engine, &[(6, 6), (6, 7), (8, 8), (5, 5), (9, 9)]);

        for _ in 0..5 {
            assert_eq!(engine.undo(), UndoOutcome::Reverted);
        }
        assert_eq!(engine.undo(), UndoOutcome::NoChange);

        assert_eq!(engine.board(), fresh.board());
        assert_eq!(engine.mover(), fresh.mover());
        assert_eq!(engine.move_count(), 1);
        assert_eq!(engine.clocks(), fresh.clocks());
    }

    #[test]
    fn undo_reopens_a_finished_match() {
        let mut engine = engine(15);
        play(
            &mut engine,
            &[(8, 7), (7, 8), (8, 8), (7, 9), (8, 9), (7, 10), (8, 10), (7, 11)],
        );
        let announce = engine.drain_deferred();

        assert_eq!(engine.undo(), UndoOutcome::Reverted);

        assert_eq!(engine.outcome(), None);
        assert_eq!(engine.winning_line(), None);
        assert_eq!(engine.cell_at((7, 10)), Cell::Stone(Player::P1));
        assert_eq!(engine.cell_at((7, 11)), Cell::Empty);
        assert_eq!(engine.mover(), Player::P1);
        assert!(!engine.apply_deferred(&announce[0]));
        assert_eq!(engine.tick(), TickOutcome::Ticked);
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        // 3x3 cannot hold a five, so filling it ends in a draw
        let mut engine = engine(3);
        let moves = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)];
        for coords in moves {
            assert_eq!(engine.attempt_move(coords), Ok(MoveOutcome::Placed));
        }

        assert_eq!(engine.attempt_move((2, 2)), Ok(MoveOutcome::Drawn));
        assert_eq!(engine.outcome(), Some(GameOutcome::Draw));
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.attempt_move((2, 2)), Err(GameError::GameOver));
    }

    #[test]
    fn stale_flash_clear_is_ignored_after_reset() {
        let mut engine = engine(15);
        engine.attempt_move((0, 0)).unwrap_err();
        let pending = engine.drain_deferred();

        engine.reset(15);

        assert!(!engine.apply_deferred(&pending[0]));
        assert!(engine.drain_deferred().is_empty());
    }
}
