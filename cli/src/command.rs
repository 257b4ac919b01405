use anyhow::{Context, bail};
use morpion_core::Coord;
use morpion_protocol::ClientMessage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Message(ClientMessage),
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  <row> <col>    place a stone (zero-based, `7 7` or `7,7`)
  u, undo        take back the last move
  r, reset [n]   new match, optionally on an n x n board
  p, pause       stop the clocks
  resume         restart the clocks
  v, view        redraw the board
  q, quit        leave";

/// Parses one line of the text interface.
pub(crate) fn parse_text(line: &str) -> anyhow::Result<Input> {
    let mut words = line.split([' ', ',', '\t']).filter(|word| !word.is_empty());
    let Some(first) = words.next() else {
        return Ok(Input::Message(ClientMessage::View));
    };

    let message = match first {
        "q" | "quit" | "exit" => return Ok(Input::Quit),
        "u" | "undo" => ClientMessage::Undo,
        "r" | "reset" => {
            let board_size = words
                .next()
                .map(|word| word.parse::<Coord>())
                .transpose()
                .context("board size must be a number")?;
            ClientMessage::Reset { board_size }
        }
        "p" | "pause" => ClientMessage::SetPaused { paused: true },
        "resume" => ClientMessage::SetPaused { paused: false },
        "v" | "view" => ClientMessage::View,
        row => {
            let row = row
                .parse::<Coord>()
                .with_context(|| format!("unknown command `{row}`"))?;
            let Some(col) = words.next() else {
                bail!("missing column after row {row}");
            };
            let col = col.parse::<Coord>().context("column must be a number")?;
            ClientMessage::Move { row, col }
        }
    };

    if words.next().is_some() {
        bail!("trailing input after `{first}`");
    }
    Ok(Input::Message(message))
}
