#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod coords;
mod moves;
pub mod rules;
pub mod search;
pub mod selection;
mod square;
pub mod status;
pub mod worker;

use std::{fmt::Display, str::FromStr};

pub use config::{SearchBudget, SessionConfig};
pub use controller::{Click, SessionError, TurnController, TurnState};
pub use coords::{BoardGeometry, Cell, Orientation};
pub use moves::{Move, ParseMoveError};
pub use rules::RulesEngine;
pub use search::SearchEngine;
pub use square::{ParseSquareError, Square};
pub use status::GameStatus;

/// Of which kind a piece is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PieceKind {
    /// a pawn (♙)
    #[default]
    Pawn,
    /// a rook (♖)
    Rook,
    /// a knight (♘)
    Knight,
    /// a bishop (♗)
    Bishop,
    /// a queen (♕)
    Queen,
    /// a king (♔)
    King,
}

impl PieceKind {
    /// the lowercase letter used for this kind in FEN and UCI promotions
    pub const fn char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// inverse of [`PieceKind::char`], case insensitive
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The player with the light pieces, moves first
    White,
    /// The player with the dark pieces
    Black,
}

impl Side {
    /// returns the opponent
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Error that arises from parsing a [`Side`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected `white` or `black`, got {0:?}")]
pub struct ParseSideError(String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            _ => Err(ParseSideError(s.to_owned())),
        }
    }
}

/// A piece as it stands on the board: its kind and who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    /// what kind of piece
    pub kind: PieceKind,
    /// who owns it
    pub side: Side,
}

impl Piece {
    /// Constructs a new piece
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }
}

impl Display for Piece {
    /// FEN letter: uppercase for White, lowercase for Black
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.kind.char();
        match self.side {
            Side::White => write!(f, "{}", c.to_ascii_uppercase()),
            Side::Black => write!(f, "{c}"),
        }
    }
}
