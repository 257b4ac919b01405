use anyhow::Context;
use clap::Parser;
use morpion_core::{Coord, GameConfig, Seconds};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Hotseat five-in-a-row in the terminal", long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with match settings, command line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board width and height
    #[arg(short, long)]
    pub size: Option<Coord>,

    /// Seconds on each player's clock
    #[arg(long)]
    pub clock: Option<Seconds>,

    /// Seconds allowed between two moves
    #[arg(long)]
    pub inactivity: Option<Seconds>,

    /// Speak protocol JSON lines on stdin/stdout instead of text commands
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                parse_config(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => GameConfig::default(),
        };

        if let Some(size) = self.size {
            config.board_size = size;
        }
        if let Some(clock) = self.clock {
            config.clock_budget = clock;
        }
        if let Some(inactivity) = self.inactivity {
            config.inactivity_budget = inactivity;
        }

        Ok(config.normalized())
    }
}

fn parse_config(text: &str) -> anyhow::Result<GameConfig> {
    Ok(toml::from_str(text)?)
}
