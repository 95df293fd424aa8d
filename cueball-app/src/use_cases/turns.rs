//! Turn recording use cases.

use std::sync::Arc;

use cueball_domain::Turn;
use cueball_exec::{completion, Work};
use cueball_store::MatchRepository;

use super::UseCase;
use crate::error::upstream;

/// A turn to record on a match
#[derive(Debug, Clone)]
pub struct TurnParams {
    /// Match the turn belongs to
    pub match_id: String,
    /// The turn
    pub turn: Turn,
}

impl TurnParams {
    /// Pair a turn with its match
    pub fn new(match_id: impl Into<String>, turn: Turn) -> Self {
        Self {
            match_id: match_id.into(),
            turn,
        }
    }
}

/// Append a turn to a match. Completes without a value.
pub struct AddTurn<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> AddTurn<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for AddTurn<R> {
    type Params = TurnParams;
    type Output = ();

    fn build(&self, params: TurnParams) -> Work<()> {
        let repository = Arc::clone(&self.repository);
        completion(async move {
            repository
                .add_turn(&params.match_id, &params.turn)
                .await
                .map_err(upstream)
        })
    }
}

/// Remove the last turn of a match. Completes without a value.
pub struct UndoTurn<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> UndoTurn<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for UndoTurn<R> {
    type Params = String;
    type Output = ();

    fn build(&self, match_id: String) -> Work<()> {
        let repository = Arc::clone(&self.repository);
        completion(async move { repository.undo_turn(&match_id).await.map_err(upstream) })
    }
}
