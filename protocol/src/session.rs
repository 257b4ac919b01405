use core::time::Duration;
use morpion_core::{Advance, Controller, DeferredAction, GameConfig, MatchView};

use crate::*;

/// Applies client messages to a controller and reports what changed.
#[derive(Debug)]
pub struct Session {
    controller: Controller,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            controller: Controller::new(config),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn view(&self) -> MatchView {
        self.controller.view()
    }

    pub fn handle(&mut self, message: ClientMessage) -> Vec<ServerMessage> {
        log::trace!("Handling {:?}", message);
        let mut replies = Vec::new();

        match message {
            ClientMessage::Reset { board_size } => {
                let size = board_size.unwrap_or(self.controller.engine().size());
                self.controller.reset(size);
            }
            ClientMessage::Move { row, col } => {
                let player = self.controller.engine().mover();
                match self.controller.attempt_move((row, col)) {
                    Ok(outcome) => replies.push(ServerMessage::Accepted {
                        row,
                        col,
                        player,
                        finished: outcome.is_terminal(),
                    }),
                    Err(err) => {
                        log::debug!("Move at ({}, {}) rejected: {}", row, col, err);
                        replies.push(ServerMessage::Rejected {
                            row,
                            col,
                            reason: err.into(),
                        });
                    }
                }
            }
            ClientMessage::Undo => {
                let applied = self.controller.undo().has_update();
                replies.push(ServerMessage::Undone { applied });
            }
            ClientMessage::SetPaused { paused } => {
                self.controller.set_paused(paused);
                replies.push(ServerMessage::Paused { paused });
            }
            ClientMessage::Tick => {
                let report = self.controller.tick();
                self.push_advance(report, &mut replies);
            }
            ClientMessage::Advance { millis } => {
                let report = self.controller.advance(Duration::from_millis(millis));
                self.push_advance(report, &mut replies);
            }
            ClientMessage::View => {}
        }

        replies.push(ServerMessage::View {
            view: Box::new(self.view()),
        });
        replies
    }

    /// Consumes the session, cancelling every pending deferred event.
    pub fn close(self) -> usize {
        self.controller.shutdown()
    }

    fn push_advance(&self, report: Advance, replies: &mut Vec<ServerMessage>) {
        if report.ticks > 0 || report.timed_out {
            replies.push(ServerMessage::Ticked {
                ticks: report.ticks,
                timed_out: report.timed_out,
            });
        }

        for action in report.fired {
            match action {
                DeferredAction::AnnounceOutcome => {
                    if let Some(outcome) = self.controller.engine().outcome() {
                        replies.push(ServerMessage::Announce { outcome });
                    }
                }
                DeferredAction::ClearFlash((row, col)) => {
                    replies.push(ServerMessage::FlashCleared { row, col });
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
