//! Notes and location edits.

use std::sync::Arc;

use cueball_exec::{completion, Work};
use cueball_store::MatchRepository;

use super::UseCase;
use crate::error::upstream;

/// New value for a text field of a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    /// Match to edit
    pub match_id: String,
    /// Replacement text
    pub value: String,
}

impl FieldUpdate {
    /// Build an update
    pub fn new(match_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            value: value.into(),
        }
    }
}

/// Replace the notes of a match. Completes without a value.
pub struct UpdateMatchNotes<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> UpdateMatchNotes<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for UpdateMatchNotes<R> {
    type Params = FieldUpdate;
    type Output = ();

    fn build(&self, update: FieldUpdate) -> Work<()> {
        let repository = Arc::clone(&self.repository);
        completion(async move {
            repository
                .update_notes(&update.match_id, &update.value)
                .await
                .map_err(upstream)
        })
    }
}

/// Replace the location of a match. Completes without a value.
pub struct UpdateMatchLocation<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> UpdateMatchLocation<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for UpdateMatchLocation<R> {
    type Params = FieldUpdate;
    type Output = ();

    fn build(&self, update: FieldUpdate) -> Work<()> {
        let repository = Arc::clone(&self.repository);
        completion(async move {
            repository
                .update_location(&update.match_id, &update.value)
                .await
                .map_err(upstream)
        })
    }
}
