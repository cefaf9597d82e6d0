//! The turn state machine: takes the human's clicks, plays their moves and hands the turn to
//! the engine.

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::{
    config::{SearchBudget, SessionConfig},
    coords::Orientation,
    rules::{RulesEngine, RulesError},
    search::{SearchEngine, SearchError},
    selection::Selection,
    status::{self, GameStatus},
    worker::{SearchWorker, WorkerError},
    Move, PieceKind, Side, Square,
};

/// What a pawn reaching the last rank turns into when the human moves it there.
pub const DEFAULT_PROMOTION: PieceKind = PieceKind::Queen;

/// Where the controller is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// the human has to pick one of their pieces
    WaitingForSelection,
    /// a piece is selected, the human has to pick where it goes
    WaitingForDestination,
    /// the engine is to move, clicks are ignored
    AwaitingAutomatedReply,
    /// the game has ended, nothing changes anymore
    GameOver,
}

impl Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TurnState::WaitingForSelection => "waiting for selection",
            TurnState::WaitingForDestination => "waiting for destination",
            TurnState::AwaitingAutomatedReply => "awaiting automated reply",
            TurnState::GameOver => "game over",
        };
        write!(f, "{s}")
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Click {
    /// nothing changed
    Ignored,
    /// the square was selected, replacing any earlier selection
    Selected(Square),
    /// the selected square was clicked again and is no longer selected
    Deselected,
    /// the move was played
    Moved(Move),
}

/// Error that ends a session. Illegal clicks are never errors, see [`TurnController::click`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// an automated reply was supplied while the human is to move or the game is over
    #[error("no automated reply expected while {0}")]
    NotAwaitingReply(TurnState),
    /// the search engine proposed a move that isn't legal
    #[error("search engine proposed illegal move {0}")]
    IllegalReply(Move),
    /// the search engine failed
    #[error(transparent)]
    Search(#[from] SearchError),
    /// the search thread failed
    #[error(transparent)]
    Worker(#[from] WorkerError),
    /// the rules engine refused a move it had listed as legal
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// One game between a human and an engine.
///
/// Holds the position (through its [`RulesEngine`]), the selection and the settings. The
/// position changes only through moves played by [`click`](TurnController::click) and
/// [`apply_automated_reply`](TurnController::apply_automated_reply), one at a time.
#[derive(Debug)]
pub struct TurnController<R> {
    rules: R,
    config: SessionConfig,
    selection: Selection,
    state: TurnState,
    last_move: Option<Move>,
}

impl<R: RulesEngine> TurnController<R> {
    /// Starts a session on the position held by `rules`.
    ///
    /// When the engine is to move first (the human plays Black from the starting position),
    /// the controller starts in [`TurnState::AwaitingAutomatedReply`].
    pub fn new(rules: R, config: SessionConfig) -> Self {
        let mut controller = TurnController {
            rules,
            config,
            selection: Selection::new(),
            state: TurnState::WaitingForSelection,
            last_move: None,
        };
        controller.state = controller.next_state();
        info!(
            human = %config.human_side(),
            budget = %config.search_budget(),
            state = %controller.state,
            "session started"
        );
        controller
    }

    /// where the controller is within the turn
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// the status of the game, derived from the current position
    pub fn status(&self) -> GameStatus {
        status::evaluate(&self.rules)
    }

    /// the selected square and its highlighted destinations
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// how the board is drawn
    pub fn orientation(&self) -> Orientation {
        self.config.orientation()
    }

    /// the side the human plays
    pub fn human_side(&self) -> Side {
        self.config.human_side()
    }

    /// the budget the engine gets for each reply
    pub fn search_budget(&self) -> SearchBudget {
        self.config.search_budget()
    }

    /// the rules engine holding the position
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// the current position
    pub fn position(&self) -> &R::Position {
        self.rules.position()
    }

    /// the most recently played move, by either side
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Handles a click on `square`.
    ///
    /// Never fails: a click that doesn't make sense in the current state changes nothing and
    /// returns [`Click::Ignored`]. Clicking another of the human's pieces while one is selected
    /// selects that piece instead, without having to deselect first.
    pub fn click(&mut self, square: Square) -> Click {
        match self.state {
            TurnState::WaitingForSelection => {
                if self.is_human_piece(square) {
                    self.select(square)
                } else {
                    Click::Ignored
                }
            }
            TurnState::WaitingForDestination => {
                let Some(selected) = self.selection.selected() else {
                    // selection and state are updated together
                    self.state = TurnState::WaitingForSelection;
                    return self.click(square);
                };

                if selected == square {
                    debug!(%square, "deselected");
                    self.selection.clear();
                    self.state = TurnState::WaitingForSelection;
                    return Click::Deselected;
                }

                if let Some(mv) = self.resolve(selected, square) {
                    return match self.play(mv) {
                        Ok(()) => {
                            info!(%mv, state = %self.state, "human moved");
                            Click::Moved(mv)
                        }
                        Err(e) => {
                            warn!(%mv, %e, "rules engine refused a listed move");
                            Click::Ignored
                        }
                    };
                }

                if self.is_human_piece(square) {
                    self.select(square)
                } else {
                    Click::Ignored
                }
            }
            TurnState::AwaitingAutomatedReply | TurnState::GameOver => Click::Ignored,
        }
    }

    /// Asks `engine` for a reply and plays it, blocking until the engine answers.
    pub fn play_automated_reply<S>(&mut self, engine: &mut S) -> Result<Move, SessionError>
    where
        S: SearchEngine<R::Position> + ?Sized,
    {
        self.expect_reply()?;
        let mv = engine.choose_move(self.rules.position(), self.search_budget())?;
        self.apply_automated_reply(mv)
    }

    /// Plays the engine's reply `mv`, which must be legal.
    ///
    /// Fails without touching the position if the engine is not to move or `mv` is not legal.
    pub fn apply_automated_reply(&mut self, mv: Move) -> Result<Move, SessionError> {
        self.expect_reply()?;
        if !self.rules.legal_moves().contains(&mv) {
            return Err(SessionError::IllegalReply(mv));
        }
        self.play(mv)?;
        info!(%mv, state = %self.state, "engine moved");
        Ok(mv)
    }

    /// Drives `worker` without blocking: sends it the position when the engine is to move,
    /// and plays its reply once it has arrived. Returns the move that was played, if any.
    ///
    /// A request still pending when the engine is no longer to move is cancelled.
    pub fn poll_worker(
        &mut self,
        worker: &mut SearchWorker<R::Position>,
    ) -> Result<Option<Move>, SessionError> {
        if self.state != TurnState::AwaitingAutomatedReply {
            worker.cancel();
            return Ok(None);
        }
        if !worker.is_pending() {
            worker.request(self.rules.position().clone(), self.search_budget())?;
            return Ok(None);
        }
        match worker.try_recv()? {
            Some(mv) => self.apply_automated_reply(mv).map(Some),
            None => Ok(None),
        }
    }

    fn expect_reply(&self) -> Result<(), SessionError> {
        match self.state {
            TurnState::AwaitingAutomatedReply => Ok(()),
            state => Err(SessionError::NotAwaitingReply(state)),
        }
    }

    fn is_human_piece(&self, square: Square) -> bool {
        matches!(self.rules.piece_at(square), Some(piece) if piece.side == self.human_side())
    }

    fn select(&mut self, square: Square) -> Click {
        let destinations = self.rules.legal_destinations(square);
        debug!(%square, destinations = destinations.len(), "selected");
        self.selection.select(square, destinations);
        self.state = TurnState::WaitingForDestination;
        Click::Selected(square)
    }

    /// The legal move from `from` to `to`. A promotion becomes [`DEFAULT_PROMOTION`].
    fn resolve(&self, from: Square, to: Square) -> Option<Move> {
        self.rules.legal_moves().into_iter().find(|mv| {
            mv.from() == from
                && mv.to() == to
                && matches!(mv.promotion(), None | Some(DEFAULT_PROMOTION))
        })
    }

    fn play(&mut self, mv: Move) -> Result<(), RulesError> {
        self.rules.apply(mv)?;
        self.last_move = Some(mv);
        self.selection.clear();
        self.state = self.next_state();
        Ok(())
    }

    /// The state at the start of a ply: who is to move, unless the game is over.
    fn next_state(&self) -> TurnState {
        let status = self.status();
        if status.is_terminal() {
            info!(%status, result = status.result(), "game over");
            TurnState::GameOver
        } else if self.rules.side_to_move() == self.human_side() {
            TurnState::WaitingForSelection
        } else {
            TurnState::AwaitingAutomatedReply
        }
    }
}
