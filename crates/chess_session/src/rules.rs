//! The rules of chess, as far as the turn controller needs them.

mod standard;

pub use standard::{to_fen, StandardRules};

use crate::{selection::Destinations, Move, Piece, Side, Square};

/// Error that arises from the rules engine
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RulesError {
    /// the move is not legal in the current position, nothing was changed
    #[error("{0} is not a legal move")]
    IllegalMove(Move),
    /// a starting position could not be set up
    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

/// Owns a position and knows which moves are legal in it.
///
/// The position is created once and from then on only changes through [`RulesEngine::apply`].
pub trait RulesEngine {
    /// A snapshot of the position, handed to the search engine
    type Position: Clone + Send + 'static;

    /// the current position
    fn position(&self) -> &Self::Position;

    /// whose turn it is
    fn side_to_move(&self) -> Side;

    /// every legal move of the side to move
    fn legal_moves(&self) -> Vec<Move>;

    /// Plays `mv`. Fails without touching the position if `mv` is not legal
    fn apply(&mut self, mv: Move) -> Result<(), RulesError>;

    /// the side to move is in check and has no legal move
    fn is_checkmate(&self) -> bool;

    /// the side to move is not in check and has no legal move
    fn is_stalemate(&self) -> bool;

    /// neither side has enough material left to ever deliver mate
    fn has_insufficient_material(&self) -> bool;

    /// the piece on `square`, if any
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Where the piece on `from` may go. Promotions to different pieces share a destination,
    /// which is listed once.
    fn legal_destinations(&self, from: Square) -> Destinations {
        let mut destinations = Destinations::default();
        for mv in self.legal_moves().into_iter().filter(|mv| mv.from() == from) {
            if !destinations.contains(&mv.to()) {
                destinations.push(mv.to());
            }
        }
        destinations
    }
}
