use std::path::PathBuf;

use anyhow::Context;
use chess_engine::UciEngine;
use chess_session::{rules::StandardRules, BoardGeometry, SearchBudget, SessionConfig, Side};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// play in a window, by clicking squares
    Gui,
    /// play in the terminal, by typing squares
    Cli,
}

/// Play chess against a UCI engine
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Opts {
    /// where to play
    #[clap(short, long, value_enum, default_value_t = Mode::Gui)]
    pub mode: Mode,
    /// the side you play, asked for at startup if not given
    #[clap(short, long)]
    pub side: Option<Side>,
    /// how many plies the engine searches for each reply
    #[clap(short, long, default_value_t = SearchBudget::DEFAULT_DEPTH)]
    pub depth: u32,
    /// the UCI engine to play against, looked up in PATH
    #[clap(short, long, default_value = "stockfish")]
    pub engine: PathBuf,
    /// some starting position, in FEN format
    #[clap(short, long)]
    pub fen: Option<String>,
    /// edge length of one square, in pixels
    #[clap(short, long, default_value_t = 75, value_parser = clap::value_parser!(u32).range(8..=512))]
    pub cell_size: u32,
}

impl Opts {
    /// the session settings once the human has picked `side`
    pub fn session(&self, side: Side) -> anyhow::Result<SessionConfig> {
        SessionConfig::new(side, self.depth).context("invalid --depth")
    }

    pub fn rules(&self) -> anyhow::Result<StandardRules> {
        match &self.fen {
            Some(fen) => {
                StandardRules::from_fen(fen).with_context(|| format!("invalid --fen {fen:?}"))
            }
            None => Ok(StandardRules::new()),
        }
    }

    pub fn engine(&self) -> anyhow::Result<UciEngine> {
        UciEngine::spawn(&self.engine)
            .with_context(|| format!("could not start {}", self.engine.display()))
    }

    pub fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.cell_size)
    }
}
