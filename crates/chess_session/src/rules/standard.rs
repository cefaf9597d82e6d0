use shakmaty::{fen::Fen, CastlingMode, Chess, Color, EnPassantMode, Position as _, Role};

use super::{RulesEngine, RulesError};
use crate::{Move, Piece, PieceKind, Side, Square};

/// Standard chess, backed by [`shakmaty`].
#[derive(Debug, Clone, Default)]
pub struct StandardRules {
    position: Chess,
}

impl StandardRules {
    /// the standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets up a position from FEN.
    ///
    /// ```
    /// # use chess_session::{rules::{RulesEngine, StandardRules}, Side};
    /// let rules = StandardRules::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1").unwrap();
    /// assert_eq!(rules.side_to_move(), Side::Black);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let fen: Fen = fen
            .parse()
            .map_err(|e: shakmaty::fen::ParseFenError| RulesError::InvalidPosition(e.to_string()))?;
        let position = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| RulesError::InvalidPosition(e.to_string()))?;
        Ok(Self { position })
    }

    /// the current position in FEN
    pub fn fen(&self) -> String {
        to_fen(&self.position)
    }

    fn find(&self, mv: Move) -> Option<shakmaty::Move> {
        let turn = self.position.turn();
        self.position
            .legal_moves()
            .into_iter()
            .find(|candidate| from_shakmaty(candidate, turn) == Some(mv))
    }
}

impl From<Chess> for StandardRules {
    fn from(position: Chess) -> Self {
        Self { position }
    }
}

/// FEN of a shakmaty position
pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

impl RulesEngine for StandardRules {
    type Position = Chess;

    fn position(&self) -> &Chess {
        &self.position
    }

    fn side_to_move(&self) -> Side {
        side(self.position.turn())
    }

    fn legal_moves(&self) -> Vec<Move> {
        let turn = self.position.turn();
        self.position
            .legal_moves()
            .iter()
            .filter_map(|mv| from_shakmaty(mv, turn))
            .collect()
    }

    fn apply(&mut self, mv: Move) -> Result<(), RulesError> {
        let legal = self.find(mv).ok_or(RulesError::IllegalMove(mv))?;
        self.position.play_unchecked(&legal);
        Ok(())
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn has_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_shakmaty(square))
            .map(|piece| Piece::new(kind(piece.role), side(piece.color)))
    }
}

fn side(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn to_shakmaty(square: Square) -> shakmaty::Square {
    shakmaty::Square::new(u32::from(square.index()))
}

fn from_square(square: shakmaty::Square) -> Square {
    // shakmaty numbers squares the same way, a1 = 0
    Square::new(u32::from(square) as u8)
}

/// Castling becomes the king's two-square step, drops (which standard chess has none of) are
/// skipped.
fn from_shakmaty(mv: &shakmaty::Move, turn: Color) -> Option<Move> {
    let from = from_square(mv.from()?);
    let to = match mv.castling_side() {
        Some(castling_side) => castling_side.king_to(turn),
        None => mv.to(),
    };
    let to = from_square(to);
    Some(match mv.promotion() {
        Some(role) => Move::with_promotion(from, to, kind(role)),
        None => Move::new(from, to),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn starting_position() {
        let rules = StandardRules::new();
        assert_eq!(rules.side_to_move(), Side::White);
        assert_eq!(rules.legal_moves().len(), 20);
        assert_eq!(
            rules.piece_at(sq("e1")),
            Some(Piece::new(PieceKind::King, Side::White))
        );
        assert_eq!(
            rules.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Side::Black))
        );
        assert_eq!(rules.piece_at(sq("e4")), None);
        assert_eq!(
            rules.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn applies_legal_moves_only() {
        let mut rules = StandardRules::new();
        assert_eq!(rules.apply(mv("e2e5")), Err(RulesError::IllegalMove(mv("e2e5"))));
        assert_eq!(rules.side_to_move(), Side::White);

        rules.apply(mv("e2e4")).unwrap();
        assert_eq!(rules.side_to_move(), Side::Black);
        assert_eq!(
            rules.piece_at(sq("e4")),
            Some(Piece::new(PieceKind::Pawn, Side::White))
        );
        assert_eq!(rules.piece_at(sq("e2")), None);
    }

    #[test]
    fn castling_is_the_kings_step() {
        let mut rules =
            StandardRules::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let destinations = rules.legal_destinations(sq("e1"));
        assert!(destinations.contains(&sq("g1")));
        assert!(destinations.contains(&sq("c1")));
        assert!(!destinations.contains(&sq("h1")));

        rules.apply(mv("e1g1")).unwrap();
        assert_eq!(
            rules.piece_at(sq("g1")),
            Some(Piece::new(PieceKind::King, Side::White))
        );
        assert_eq!(
            rules.piece_at(sq("f1")),
            Some(Piece::new(PieceKind::Rook, Side::White))
        );
    }

    #[test]
    fn promotions_share_a_destination() {
        let rules = StandardRules::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promotions = rules
            .legal_moves()
            .into_iter()
            .filter(|m| m.from() == sq("a7"))
            .count();
        assert_eq!(promotions, 4);
        assert_eq!(rules.legal_destinations(sq("a7")).as_slice(), &[sq("a8")]);
    }

    #[test]
    fn rejects_broken_fen() {
        assert!(StandardRules::from_fen("not a fen").is_err());
        // no kings
        assert!(StandardRules::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }
}
