//! Conversions between screen pixels, visual grid cells and canonical [`Square`]s.
//!
//! A [`Cell`] is what the user sees: column 0 is the left edge, row 0 the top edge. Which
//! square sits in a cell depends on the [`Orientation`]. Drawing and click handling both go
//! through [`square_to_cell`] / [`cell_to_square`], which are exact inverses of each other.

use crate::{Side, Square};

/// How the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// White at the bottom, a1 in the bottom left corner
    #[default]
    Normal,
    /// Black at the bottom, h8 in the bottom left corner
    Flipped,
}

impl Orientation {
    /// the orientation that puts `side`'s pieces at the bottom of the screen
    pub const fn for_side(side: Side) -> Self {
        match side {
            Side::White => Orientation::Normal,
            Side::Black => Orientation::Flipped,
        }
    }

    /// whether the board is drawn from Black's point of view
    pub const fn is_flipped(self) -> bool {
        matches!(self, Orientation::Flipped)
    }
}

/// A visual grid cell, `(0, 0)` being the top left corner of the drawn board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    col: u8,
    row: u8,
}

impl Cell {
    /// Creates a new cell.
    ///
    /// ## Panics
    ///
    /// Panics if `col >= 8` or if `row >= 8`. To fail recoverably, use [`Cell::try_new`]
    pub fn new(col: u8, row: u8) -> Self {
        assert!(col < 8);
        assert!(row < 8);
        Cell { col, row }
    }

    /// Creates a new cell. Returns `None` if it would lie outside the board
    pub fn try_new(col: u8, row: u8) -> Option<Self> {
        (col < 8 && row < 8).then_some(Cell { col, row })
    }

    /// column, counted from the left
    pub fn col(self) -> u8 {
        self.col
    }

    /// row, counted from the top
    pub fn row(self) -> u8 {
        self.row
    }

    fn mirrored(self) -> Self {
        Cell {
            col: 7 - self.col,
            row: 7 - self.row,
        }
    }
}

/// Which cell a pixel falls in, given the pixel is relative to the board's top left corner.
///
/// Callers reject pixels outside the board before calling this; see
/// [`BoardGeometry::square_at`].
///
/// ## Panics
///
/// Panics if the pixel lies right of or below the board, or if `cell_size` is zero.
pub fn pixel_to_cell(x: u32, y: u32, cell_size: u32) -> Cell {
    assert!(cell_size > 0, "cells must be at least one pixel wide");
    let index = |v: u32| u8::try_from(v / cell_size).unwrap_or(u8::MAX);
    Cell::new(index(x), index(y))
}

/// The square shown in `cell`.
///
/// ```
/// # use chess_session::{coords::*, Square};
/// let e2: Square = "e2".parse().unwrap();
/// assert_eq!(cell_to_square(Cell::new(4, 6), Orientation::Normal), e2);
/// assert_eq!(cell_to_square(Cell::new(3, 1), Orientation::Flipped), e2);
/// ```
pub fn cell_to_square(cell: Cell, orientation: Orientation) -> Square {
    let cell = match orientation {
        Orientation::Normal => cell,
        Orientation::Flipped => cell.mirrored(),
    };
    Square::from_coords(cell.col, 7 - cell.row)
}

/// The cell in which `square` is drawn. Inverse of [`cell_to_square`].
pub fn square_to_cell(square: Square, orientation: Orientation) -> Cell {
    let cell = Cell {
        col: square.file(),
        row: 7 - square.rank(),
    };
    match orientation {
        Orientation::Normal => cell,
        Orientation::Flipped => cell.mirrored(),
    }
}

/// Where the board sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// x of the board's top left corner
    pub origin_x: i32,
    /// y of the board's top left corner
    pub origin_y: i32,
    /// edge length of one cell, in pixels
    pub cell_size: u32,
}

impl BoardGeometry {
    /// a board whose top left corner is at the window's origin
    pub const fn new(cell_size: u32) -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            cell_size,
        }
    }

    /// edge length of the whole board, in pixels
    pub const fn board_size(&self) -> u32 {
        self.cell_size * 8
    }

    /// The cell under a window pixel, `None` if the pixel is off the board
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let x = u32::try_from(x.checked_sub(self.origin_x)?).ok()?;
        let y = u32::try_from(y.checked_sub(self.origin_y)?).ok()?;
        if self.cell_size == 0 || x >= self.board_size() || y >= self.board_size() {
            return None;
        }
        Some(pixel_to_cell(x, y, self.cell_size))
    }

    /// The square under a window pixel, `None` if the pixel is off the board
    pub fn square_at(&self, x: i32, y: i32, orientation: Orientation) -> Option<Square> {
        self.cell_at(x, y)
            .map(|cell| cell_to_square(cell, orientation))
    }

    /// window coordinates of the top left corner of `cell`
    pub fn cell_origin(&self, cell: Cell) -> (i32, i32) {
        let size = self.cell_size as i32;
        (
            self.origin_x + cell.col as i32 * size,
            self.origin_y + cell.row as i32 * size,
        )
    }
}
