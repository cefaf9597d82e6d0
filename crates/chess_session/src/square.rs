use std::{fmt::Display, str::FromStr};

/// One of the 64 cells of the board, numbered `file + 8 * rank` (a1 = 0, h8 = 63).
///
/// The numbering never depends on how the board is drawn; see [`crate::coords`] for that.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from its index.
    ///
    /// ## Panics
    ///
    /// Panics if `index >= 64`. To fail recoverably, use [`Square::try_new`] instead
    pub fn new(index: u8) -> Square {
        assert!(index < 64);
        Square(index)
    }

    /// Creates a square from its index. Returns `None` if the index is off the board
    pub fn try_new(index: u8) -> Option<Square> {
        (index < 64).then_some(Square(index))
    }

    /// Creates a square from a file (`a` = 0) and a rank (`1` = 0).
    ///
    /// ## Panics
    ///
    /// Panics if `file >= 8` or if `rank >= 8`.
    ///
    /// ```
    /// # use chess_session::*;
    /// assert_eq!(Square::from_coords(4, 3), "e4".parse().unwrap());
    /// ```
    pub fn from_coords(file: u8, rank: u8) -> Square {
        assert!(file < 8);
        assert!(rank < 8);
        Square(file + 8 * rank)
    }

    /// returns the index in `0..64`
    pub fn index(self) -> u8 {
        self.0
    }

    /// returns the file, `a` being 0
    ///
    /// ```
    /// # use chess_session::*;
    /// assert_eq!("e4".parse::<Square>().unwrap().file(), 4);
    /// ```
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    /// returns the rank, `1` being 0
    ///
    /// ```
    /// # use chess_session::*;
    /// assert_eq!("e4".parse::<Square>().unwrap().rank(), 3);
    /// ```
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// iterates over all squares, a1 first
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl From<Square> for u8 {
    fn from(value: Square) -> Self {
        value.0
    }
}

/// Error that arises from parsing a [`Square`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("square is invalid")]
pub struct ParseSquareError;

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file = match chars.next().ok_or(ParseSquareError)? {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(ParseSquareError),
        };
        let rank = match chars.next().ok_or(ParseSquareError)? {
            c @ '1'..='8' => c as u8 - b'1',
            _ => return Err(ParseSquareError),
        };
        if chars.next().is_some() {
            return Err(ParseSquareError);
        }
        Ok(Square::from_coords(file, rank))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (self.file() + b'a') as char;
        let rank = (self.rank() + b'1') as char;
        write!(f, "{file}{rank}")
    }
}
