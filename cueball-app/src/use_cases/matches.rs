//! Match-level use cases.

use std::sync::Arc;

use cueball_domain::Match;
use cueball_exec::{completion, single, Work};
use cueball_store::{MatchFilter, MatchRepository};

use super::UseCase;
use crate::error::upstream;

/// Save a new match; emits the match as stored.
pub struct AddMatch<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> AddMatch<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for AddMatch<R> {
    type Params = Match;
    type Output = Match;

    fn build(&self, params: Match) -> Work<Match> {
        let repository = Arc::clone(&self.repository);
        single(async move { repository.add_match(&params).await.map_err(upstream) })
    }
}

/// Load one match by id.
pub struct GetMatch<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> GetMatch<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for GetMatch<R> {
    type Params = String;
    type Output = Match;

    fn build(&self, id: String) -> Work<Match> {
        let repository = Arc::clone(&self.repository);
        single(async move { repository.get_match(&id).await.map_err(upstream) })
    }
}

/// Load every match passing a filter, as one list.
pub struct GetMatchesList<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> GetMatchesList<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for GetMatchesList<R> {
    type Params = MatchFilter;
    type Output = Vec<Match>;

    fn build(&self, filter: MatchFilter) -> Work<Vec<Match>> {
        let repository = Arc::clone(&self.repository);
        single(async move { repository.get_matches(&filter).await.map_err(upstream) })
    }
}

/// Delete a match. Completes without a value.
pub struct DeleteMatch<R: MatchRepository> {
    repository: Arc<R>,
}

impl<R: MatchRepository> DeleteMatch<R> {
    /// Create the use case over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: MatchRepository + 'static> UseCase for DeleteMatch<R> {
    type Params = String;
    type Output = ();

    fn build(&self, id: String) -> Work<()> {
        let repository = Arc::clone(&self.repository);
        completion(async move { repository.remove_match(&id).await.map_err(upstream) })
    }
}
