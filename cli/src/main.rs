use clap::Parser;
use morpion_protocol::{ClientMessage, ServerMessage, Session};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use web_time::Instant;

mod args;
mod command;
mod render;

/// How often elapsed time is fed to the session while waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config()?;
    log::debug!("config: {:?}", config);

    let mut session = Session::new(config);
    let mut host = Host {
        json: args.json,
        out: io::stdout().lock(),
    };

    if !host.json {
        writeln!(host.out, "{}", command::HELP)?;
    }
    host.emit(&session.handle(ClientMessage::View), true)?;

    let lines = spawn_stdin_reader();
    let mut last = Instant::now();

    loop {
        let line = match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => Some(line),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let now = Instant::now();
        let millis = u64::try_from(now.duration_since(last).as_millis()).unwrap_or(u64::MAX);
        last = now;
        let replies = session.handle(ClientMessage::Advance { millis });
        host.emit(&replies, false)?;

        let Some(line) = line else {
            continue;
        };
        match host.parse(&line) {
            Ok(command::Input::Quit) => break,
            Ok(command::Input::Message(message)) => {
                let forced = matches!(message, ClientMessage::View | ClientMessage::Reset { .. });
                host.emit(&session.handle(message), forced)?;
            }
            Err(err) => host.complain(&err)?,
        }
    }

    let cancelled = session.close();
    log::debug!("left with {} pending events cancelled", cancelled);
    Ok(())
}

struct Host<W> {
    json: bool,
    out: W,
}

impl<W: Write> Host<W> {
    fn parse(&self, line: &str) -> anyhow::Result<command::Input> {
        if self.json {
            Ok(command::Input::Message(morpion_protocol::decode(line)?))
        } else {
            command::parse_text(line)
        }
    }

    /// Writes replies; views are only drawn when `forced` or when something visible changed.
    fn emit(&mut self, replies: &[ServerMessage], forced: bool) -> anyhow::Result<()> {
        let redraw = forced || render::needs_redraw(replies);

        for reply in replies {
            if self.json {
                let quiet = matches!(reply, ServerMessage::View { .. }) && !redraw;
                if !quiet {
                    writeln!(self.out, "{}", morpion_protocol::encode(reply)?)?;
                }
                continue;
            }

            match reply {
                ServerMessage::View { view } if redraw => {
                    write!(self.out, "{}", render::Board(view))?
                }
                other => {
                    if let Some(text) = render::message(other) {
                        writeln!(self.out, "{text}")?;
                    }
                }
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn complain(&mut self, err: &anyhow::Error) -> anyhow::Result<()> {
        if self.json {
            log::warn!("ignoring input: {err:#}");
        } else {
            writeln!(self.out, "{err:#} (type `q` to quit)")?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Reads stdin on its own thread so the clocks keep running while nobody types.
fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}
