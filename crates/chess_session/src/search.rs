//! The automated opponent.

use crate::{config::SearchBudget, Move};

/// Error that arises from a [`SearchEngine`]
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// the engine had no move to offer
    #[error("search engine returned no move")]
    NoMove,
    /// the engine could not be reached or misbehaved
    #[error("search engine failed: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SearchError {
    /// wraps an engine specific error
    pub fn engine(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        SearchError::Engine(Box::new(error))
    }
}

/// Picks a move for the side to move in `P`.
///
/// The move returned for a position that is not over must be legal in it. Implementations may
/// take as long as the budget allows, callers that can't wait run them on a
/// [`SearchWorker`](crate::worker::SearchWorker).
pub trait SearchEngine<P> {
    /// chooses a move in `position`, searching no further than `budget`
    fn choose_move(&mut self, position: &P, budget: SearchBudget) -> Result<Move, SearchError>;
}

impl<P, S: SearchEngine<P> + ?Sized> SearchEngine<P> for Box<S> {
    fn choose_move(&mut self, position: &P, budget: SearchBudget) -> Result<Move, SearchError> {
        (**self).choose_move(position, budget)
    }
}
