//! Whether the game is still going, and if not, how it ended.

use std::fmt::Display;

use crate::{rules::RulesEngine, Side};

/// State of the game, derived from the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// the side to move has legal moves and the game can't end on material
    Ongoing,
    /// checkmate, delivered by the given side
    Won(Side),
    /// stalemate or insufficient material
    Drawn,
}

impl GameStatus {
    /// whether no more moves may be played
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// the result in PGN notation
    pub fn result(self) -> &'static str {
        match self {
            GameStatus::Ongoing => "*",
            GameStatus::Won(Side::White) => "1-0",
            GameStatus::Won(Side::Black) => "0-1",
            GameStatus::Drawn => "1/2-1/2",
        }
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "Game in progress"),
            GameStatus::Won(side) => write!(f, "{side} wins!"),
            GameStatus::Drawn => write!(f, "Draw!"),
        }
    }
}

/// Classifies the current position of `rules`. Nothing is cached, every call looks at the
/// position afresh.
pub fn evaluate<R: RulesEngine + ?Sized>(rules: &R) -> GameStatus {
    if rules.is_checkmate() {
        GameStatus::Won(rules.side_to_move().other())
    } else if rules.is_stalemate() || rules.has_insufficient_material() {
        GameStatus::Drawn
    } else {
        GameStatus::Ongoing
    }
}
