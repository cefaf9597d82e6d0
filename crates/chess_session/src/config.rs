//! Settings fixed at the start of a session.

use std::{fmt::Display, num::NonZeroU32};

use crate::{coords::Orientation, Side};

/// Error that arises from invalid session settings
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// the engine must be allowed to search at least one ply
    #[error("search budget must be greater than zero")]
    ZeroBudget,
}

/// How far the engine may search for each reply, in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchBudget(NonZeroU32);

impl SearchBudget {
    /// depth used when nothing else is configured
    pub const DEFAULT_DEPTH: u32 = 5;

    /// a budget of `depth` plies, which must not be zero
    pub fn new(depth: u32) -> Result<Self, ConfigError> {
        NonZeroU32::new(depth)
            .map(SearchBudget)
            .ok_or(ConfigError::ZeroBudget)
    }

    /// the search depth in plies
    pub fn depth(self) -> u32 {
        self.0.get()
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self(NonZeroU32::new(Self::DEFAULT_DEPTH).unwrap_or(NonZeroU32::MIN))
    }
}

impl Display for SearchBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "depth {}", self.0)
    }
}

/// What the human chose before the game started. Never changes during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    human_side: Side,
    search_budget: SearchBudget,
}

impl SessionConfig {
    /// Settings for a human playing `human_side` against an engine searching `depth` plies.
    ///
    /// ```
    /// # use chess_session::*;
    /// assert!(SessionConfig::new(Side::Black, 0).is_err());
    /// let config = SessionConfig::new(Side::Black, 3).unwrap();
    /// assert_eq!(config.orientation(), Orientation::Flipped);
    /// ```
    pub fn new(human_side: Side, depth: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            human_side,
            search_budget: SearchBudget::new(depth)?,
        })
    }

    /// the side the human plays
    pub fn human_side(&self) -> Side {
        self.human_side
    }

    /// the side the engine plays
    pub fn engine_side(&self) -> Side {
        self.human_side.other()
    }

    /// the budget handed to the engine for every reply
    pub fn search_budget(&self) -> SearchBudget {
        self.search_budget
    }

    /// how the board is drawn: the human's pieces at the bottom
    pub fn orientation(&self) -> Orientation {
        Orientation::for_side(self.human_side)
    }
}
