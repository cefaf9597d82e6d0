use std::{fmt::Display, str::FromStr};

use crate::{PieceKind, Square};

/// A move from one square to another, as the human or the engine proposes it.
///
/// Castling is the king's two-square step (`e1g1`). A pawn reaching the last rank carries the
/// kind it promotes to.
///
/// ```
/// # use chess_session::*;
/// let mv: Move = "e7e8q".parse().unwrap();
/// assert_eq!(mv.promotion(), Some(PieceKind::Queen));
/// assert_eq!(mv.to_string(), "e7e8q");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// a plain move without promotion
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// a pawn move that promotes to `kind`
    pub const fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// the origin square
    pub fn from(&self) -> Square {
        self.from
    }

    /// the destination square
    pub fn to(&self) -> Square {
        self.to
    }

    /// what the pawn turns into, if this is a promotion
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// Error that arises from parsing a [`Move`] in long algebraic notation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseMoveError {
    /// the input is not `<from><to>[promotion]`
    #[error("invalid format: {0:?}")]
    Format(String),
    /// a pawn can't promote to that
    #[error("cannot promote to {0}")]
    Promotion(char),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = || ParseMoveError::Format(s.to_owned());
        let from = s.get(0..2).ok_or_else(format)?.parse().map_err(|_| format())?;
        let to = s.get(2..4).ok_or_else(format)?.parse().map_err(|_| format())?;
        let mut rest = s.get(4..).ok_or_else(format)?.chars();
        let promotion = match rest.next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
                    Some(kind)
                }
                _ => return Err(ParseMoveError::Promotion(c)),
            },
        };
        if rest.next().is_some() {
            return Err(format());
        }

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}
