//! What the human has clicked on so far in the current turn.

use tinyvec::TinyVec;

use crate::{
    coords::{square_to_cell, Cell, Orientation},
    Square,
};

/// Destinations of a single piece. A queen in the middle of an empty board has 27, so this
/// rarely leaves the stack.
pub type Destinations = TinyVec<[Square; 32]>;

/// The currently selected square and the destinations highlighted for it.
///
/// At most one square is selected. Selecting another square replaces the previous selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Square>,
    highlights: Destinations,
}

impl Selection {
    /// nothing selected, nothing highlighted
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `square` and highlights `destinations`. An empty set of destinations is fine,
    /// the piece just can't go anywhere.
    pub fn select(&mut self, square: Square, destinations: impl IntoIterator<Item = Square>) {
        self.selected = Some(square);
        self.highlights.clear();
        for destination in destinations {
            if !self.highlights.contains(&destination) {
                self.highlights.push(destination);
            }
        }
    }

    /// forgets the selection
    pub fn clear(&mut self) {
        self.selected = None;
        self.highlights.clear();
    }

    /// the selected square
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// the highlighted destinations, each once
    pub fn highlights(&self) -> &[Square] {
        &self.highlights
    }

    /// whether `square` is one of the highlighted destinations
    pub fn is_highlighted(&self, square: Square) -> bool {
        self.highlights.contains(&square)
    }

    /// the cells the highlights are drawn in
    pub fn cells(&self, orientation: Orientation) -> impl Iterator<Item = Cell> + '_ {
        self.highlights
            .iter()
            .map(move |&square| square_to_cell(square, orientation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn select_replaces_previous_selection() {
        let mut selection = Selection::new();
        selection.select(sq("b1"), [sq("a3"), sq("c3")]);
        selection.select(sq("e2"), [sq("e3"), sq("e4")]);

        assert_eq!(selection.selected(), Some(sq("e2")));
        assert_eq!(selection.highlights(), &[sq("e3"), sq("e4")]);
        assert!(!selection.is_highlighted(sq("a3")));
    }

    #[test]
    fn selecting_a_stuck_piece_highlights_nothing() {
        let mut selection = Selection::new();
        selection.select(sq("a1"), std::iter::empty());

        assert_eq!(selection.selected(), Some(sq("a1")));
        assert!(selection.highlights().is_empty());
    }

    #[test]
    fn duplicate_destinations_collapse() {
        let mut selection = Selection::new();
        selection.select(sq("a7"), [sq("a8"), sq("a8"), sq("a8"), sq("a8")]);
        assert_eq!(selection.highlights(), &[sq("a8")]);
    }

    #[test]
    fn clear() {
        let mut selection = Selection::new();
        selection.select(sq("g1"), [sq("f3"), sq("h3")]);
        selection.clear();
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn cells_follow_orientation() {
        let mut selection = Selection::new();
        selection.select(sq("e2"), [sq("e4")]);
        assert_eq!(
            selection.cells(Orientation::Normal).collect::<Vec<_>>(),
            vec![Cell::new(4, 4)]
        );
        assert_eq!(
            selection.cells(Orientation::Flipped).collect::<Vec<_>>(),
            vec![Cell::new(3, 3)]
        );
    }
}
