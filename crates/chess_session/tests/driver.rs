use std::{collections::VecDeque, time::Duration};

use chess_session::{
    coords::{square_to_cell, BoardGeometry},
    rules::{RulesEngine, StandardRules},
    search::{SearchEngine, SearchError},
    worker::SearchWorker,
    Click, GameStatus, Move, Orientation, PieceKind, SearchBudget, SessionConfig, SessionError,
    Side, Square, TurnController, TurnState,
};
use pretty_assertions::assert_eq;
use shakmaty::Chess;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

/// plays the first legal move it finds
struct FirstLegal;

impl SearchEngine<Chess> for FirstLegal {
    fn choose_move(&mut self, position: &Chess, _: SearchBudget) -> Result<Move, SearchError> {
        StandardRules::from(position.clone())
            .legal_moves()
            .first()
            .copied()
            .ok_or(SearchError::NoMove)
    }
}

/// plays the given moves in order
struct Scripted(VecDeque<Move>);

impl Scripted {
    fn new(moves: &[&str]) -> Self {
        Self(moves.iter().map(|m| mv(m)).collect())
    }
}

impl SearchEngine<Chess> for Scripted {
    fn choose_move(&mut self, _: &Chess, _: SearchBudget) -> Result<Move, SearchError> {
        self.0.pop_front().ok_or(SearchError::NoMove)
    }
}

fn session(human: Side) -> TurnController<StandardRules> {
    TurnController::new(StandardRules::new(), SessionConfig::new(human, 5).unwrap())
}

/// clicks the middle of the cell showing `square`
fn click_pixel(
    controller: &mut TurnController<StandardRules>,
    geometry: &BoardGeometry,
    square: &str,
) -> Click {
    let cell = square_to_cell(sq(square), controller.orientation());
    let (x, y) = geometry.cell_origin(cell);
    let half = geometry.cell_size as i32 / 2;
    let square = geometry
        .square_at(x + half, y + half, controller.orientation())
        .expect("on the board");
    controller.click(square)
}

#[test]
fn white_opens_with_e4() {
    let mut controller = session(Side::White);
    let geometry = BoardGeometry::new(75);
    assert_eq!(controller.state(), TurnState::WaitingForSelection);

    assert_eq!(
        click_pixel(&mut controller, &geometry, "e2"),
        Click::Selected(sq("e2"))
    );
    let mut highlights = controller.selection().highlights().to_vec();
    highlights.sort();
    assert_eq!(highlights, vec![sq("e3"), sq("e4")]);

    assert_eq!(
        click_pixel(&mut controller, &geometry, "e4"),
        Click::Moved(mv("e2e4"))
    );
    assert_eq!(
        controller.rules().fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
    assert_eq!(controller.state(), TurnState::AwaitingAutomatedReply);

    let reply = controller
        .play_automated_reply(&mut Scripted::new(&["e7e5"]))
        .unwrap();
    assert_eq!(reply, mv("e7e5"));
    assert_eq!(controller.state(), TurnState::WaitingForSelection);
    assert_eq!(controller.last_move(), Some(mv("e7e5")));
}

#[test]
fn black_lets_the_engine_open() {
    let mut controller = session(Side::Black);
    assert_eq!(controller.orientation(), Orientation::Flipped);
    assert_eq!(controller.state(), TurnState::AwaitingAutomatedReply);

    // no click is accepted before the engine has moved
    assert_eq!(controller.click(sq("e7")), Click::Ignored);

    controller.play_automated_reply(&mut FirstLegal).unwrap();
    assert_eq!(controller.state(), TurnState::WaitingForSelection);
    assert_eq!(controller.rules().side_to_move(), Side::Black);

    // the flipped board shows e7 in the fourth column, second row from the bottom
    let geometry = BoardGeometry::new(75);
    assert_eq!(
        geometry.square_at(3 * 75 + 10, 6 * 75 + 10, Orientation::Flipped),
        Some(sq("e7"))
    );
    assert_eq!(
        click_pixel(&mut controller, &geometry, "e7"),
        Click::Selected(sq("e7"))
    );
}

#[test]
fn stuck_piece_can_be_swapped_for_another() {
    let mut controller = session(Side::White);

    assert_eq!(controller.click(sq("a1")), Click::Selected(sq("a1")));
    assert!(controller.selection().highlights().is_empty());
    assert_eq!(controller.state(), TurnState::WaitingForDestination);

    assert_eq!(controller.click(sq("b1")), Click::Selected(sq("b1")));
    let mut highlights = controller.selection().highlights().to_vec();
    highlights.sort();
    assert_eq!(highlights, vec![sq("a3"), sq("c3")]);
}

#[test]
fn highlights_match_legal_destinations_everywhere() {
    let mut controller = TurnController::new(
        StandardRules::from_fen("r3k2r/pPpp1ppp/8/4P3/8/2N5/PP3PPP/R3K2R w KQkq - 0 1").unwrap(),
        SessionConfig::new(Side::White, 1).unwrap(),
    );

    for square in Square::all() {
        let Some(piece) = controller.rules().piece_at(square) else {
            continue;
        };
        if piece.side != Side::White {
            continue;
        }
        if let Some(selected) = controller.selection().selected() {
            controller.click(selected);
        }
        assert_eq!(controller.click(square), Click::Selected(square));

        let mut expected: Vec<Square> = controller
            .rules()
            .legal_moves()
            .into_iter()
            .filter(|m| m.from() == square)
            .map(|m| m.to())
            .collect();
        expected.sort();
        expected.dedup();
        let mut highlights = controller.selection().highlights().to_vec();
        highlights.sort();
        assert_eq!(highlights, expected, "destinations of {square}");
    }
}

#[test]
fn engine_mate_ends_the_game() {
    // 1. f3 e5 2. g4, engine plays Black and finds Qh4#
    let mut controller = TurnController::new(
        StandardRules::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
            .unwrap(),
        SessionConfig::new(Side::White, 3).unwrap(),
    );
    assert_eq!(controller.state(), TurnState::AwaitingAutomatedReply);

    controller
        .play_automated_reply(&mut Scripted::new(&["d8h4"]))
        .unwrap();

    assert_eq!(controller.state(), TurnState::GameOver);
    assert_eq!(controller.status(), GameStatus::Won(Side::Black));

    let before = controller.rules().fen();
    controller.click(sq("e1"));
    controller.click(sq("f1"));
    assert_eq!(controller.rules().fen(), before);
    assert!(matches!(
        controller.play_automated_reply(&mut FirstLegal),
        Err(SessionError::NotAwaitingReply(TurnState::GameOver))
    ));
}

#[test]
fn illegal_reply_is_fatal_and_changes_nothing() {
    let mut controller = session(Side::Black);
    let before = controller.rules().fen();

    let err = controller
        .play_automated_reply(&mut Scripted::new(&["e1e2"]))
        .unwrap_err();
    assert!(matches!(err, SessionError::IllegalReply(m) if m == mv("e1e2")));
    assert_eq!(controller.rules().fen(), before);
}

#[test]
fn engine_without_move_is_fatal() {
    let mut controller = session(Side::Black);
    let err = controller
        .play_automated_reply(&mut Scripted::new(&[]))
        .unwrap_err();
    assert!(matches!(err, SessionError::Search(SearchError::NoMove)));
}

#[test]
fn promotion_by_click() {
    let mut controller = TurnController::new(
        StandardRules::from_fen("8/1P5k/8/8/8/8/8/K7 w - - 0 1").unwrap(),
        SessionConfig::new(Side::White, 1).unwrap(),
    );
    controller.click(sq("b7"));
    assert_eq!(
        controller.click(sq("b8")),
        Click::Moved(Move::with_promotion(sq("b7"), sq("b8"), PieceKind::Queen))
    );
    assert_eq!(controller.state(), TurnState::AwaitingAutomatedReply);
}

#[test]
fn worker_plays_the_reply_without_blocking() {
    let mut controller = session(Side::Black);
    let mut worker = SearchWorker::spawn(FirstLegal).unwrap();

    let mut reply = None;
    for _ in 0..500 {
        if let Some(mv) = controller.poll_worker(&mut worker).unwrap() {
            reply = Some(mv);
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    let reply = reply.expect("the worker should answer");
    assert_eq!(controller.last_move(), Some(reply));
    assert_eq!(controller.state(), TurnState::WaitingForSelection);
    assert!(!worker.is_pending());

    // nothing to do while the human is to move
    assert_eq!(controller.poll_worker(&mut worker).unwrap(), None);
    assert!(!worker.is_pending());
}

#[test]
fn full_game_against_first_legal_stays_legal() {
    let mut controller = session(Side::White);
    let mut engine = FirstLegal;

    for _ in 0..40 {
        match controller.state() {
            TurnState::GameOver => break,
            TurnState::AwaitingAutomatedReply => {
                controller.play_automated_reply(&mut engine).unwrap();
            }
            TurnState::WaitingForSelection | TurnState::WaitingForDestination => {
                let legal = controller.rules().legal_moves();
                let mv = *legal.last().expect("ongoing game has moves");
                controller.click(mv.from());
                let click = controller.click(mv.to());
                assert!(matches!(click, Click::Moved(played) if played.from() == mv.from() && played.to() == mv.to()));
            }
        }
        assert_eq!(
            controller.state() == TurnState::AwaitingAutomatedReply,
            controller.status() == GameStatus::Ongoing
                && controller.rules().side_to_move() == Side::Black
        );
    }
}
