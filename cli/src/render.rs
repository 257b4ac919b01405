use morpion_core::{Cell, GameOutcome, MatchView, Player, WinReason, format_clock};
use morpion_protocol::{RejectReason, ServerMessage};
use std::fmt;

fn player_name(player: Player) -> &'static str {
    match player {
        Player::P1 => "X",
        Player::P2 => "O",
    }
}

fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Stone(Player::P1) => 'x',
        Cell::Stone(Player::P2) => 'o',
        Cell::Winning(Player::P1) => 'X',
        Cell::Winning(Player::P2) => 'O',
    }
}

/// Text rendering of a view: status line, column header, then one line per row.
pub(crate) struct Board<'a>(pub &'a MatchView);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let status = match view.outcome {
            Some(_) if !view.announced => "...".to_string(),
            Some(outcome) => outcome_text(outcome),
            None if view.paused => "paused".to_string(),
            None => format!("{} to move", player_name(view.mover)),
        };
        writeln!(
            f,
            "X {}  O {}  idle {}  move {}  {}",
            format_clock(view.clocks.p1),
            format_clock(view.clocks.p2),
            format_clock(view.clocks.inactivity),
            view.move_count,
            status
        )?;

        f.write_str("   ")?;
        for col in 0..view.size {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;

        for (row, cells) in view.rows().enumerate() {
            write!(f, "{:>3}", row)?;
            for (col, cell) in cells.enumerate() {
                let flashing = view.flash == Some((row as u8, col as u8));
                let glyph = if flashing { '!' } else { cell_glyph(cell) };
                write!(f, "{:>3}", glyph)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn outcome_text(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Draw => "draw, the board is full".to_string(),
        GameOutcome::Won { winner, reason } => {
            let how = match reason {
                WinReason::Line => "five in a row",
                WinReason::ClockExpired => "opponent ran out of time",
                WinReason::Inactivity => "opponent did not move in time",
            };
            format!("{} wins, {}", player_name(winner), how)
        }
    }
}

fn reject_text(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::Occupied => "that cell is taken",
        RejectReason::GameOver => "the match is over, undo or reset",
        RejectReason::InvalidPlacement => "too far from the stones in play",
        RejectReason::Paused => "clocks are paused, resume first",
        RejectReason::InvalidCoords => "off the board",
    }
}

/// Text for messages worth a line of their own. Views are drawn separately.
pub(crate) fn message(message: &ServerMessage) -> Option<String> {
    match message {
        ServerMessage::Rejected { row, col, reason } => {
            Some(format!("({row}, {col}): {}", reject_text(*reason)))
        }
        ServerMessage::Undone { applied: false } => Some("nothing to undo".to_string()),
        ServerMessage::Paused { paused: true } => Some("clocks paused".to_string()),
        ServerMessage::Paused { paused: false } => Some("clocks running".to_string()),
        ServerMessage::Announce { outcome } => Some(outcome_text(*outcome)),
        _ => None,
    }
}

/// Whether a batch of replies changed anything the board shows.
pub(crate) fn needs_redraw(replies: &[ServerMessage]) -> bool {
    replies.iter().any(|reply| {
        matches!(
            reply,
            ServerMessage::Accepted { .. }
                | ServerMessage::Undone { applied: true }
                | ServerMessage::Announce { .. }
                | ServerMessage::FlashCleared { .. }
                | ServerMessage::Ticked {
                    timed_out: true,
                    ..
                }
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpion_core::{GameConfig, MatchEngine};

    #[test]
    fn draws_stones_and_status() {
        let mut engine = MatchEngine::new(GameConfig::new(5));
        engine.attempt_move((1, 1)).unwrap();

        let text = Board(&MatchView::from_engine(&engine)).to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "X 05:00  O 05:00  idle 00:15  move 2  X to move");
        assert_eq!(lines[1], "     0  1  2  3  4");
        assert_eq!(lines[3], "  1  .  o  .  .  .");
        assert_eq!(lines[4], "  2  .  .  x  .  .");
    }

    #[test]
    fn flash_overrides_the_cell_glyph() {
        let mut engine = MatchEngine::new(GameConfig::new(15));
        engine.attempt_move((0, 0)).unwrap_err();

        let text = Board(&MatchView::from_engine(&engine)).to_string();

        let first_row = text.lines().nth(2).unwrap();
        assert_eq!(first_row, format!("  0  !{}", "  .".repeat(14)));
    }

    #[test]
    fn redraw_only_for_visible_changes() {
        assert!(!needs_redraw(&[ServerMessage::Undone { applied: false }]));
        assert!(needs_redraw(&[ServerMessage::FlashCleared { row: 0, col: 0 }]));
        assert!(!needs_redraw(&[ServerMessage::Ticked {
            ticks: 1,
            timed_out: false,
        }]));
    }
}
