//! Domain repository backed by a document store.

use std::sync::Arc;

use async_trait::async_trait;
use cueball_codec::{match_to_record, record_to_match, turn_to_record};
use cueball_domain::{DomainError, Match, Turn};

use crate::error::StoreResult;
use crate::repository::{MatchField, MatchFilter, MatchRepository, MatchStore};

/// [`MatchRepository`] that maps every record through the codec.
pub struct MatchDataRepository<S: MatchStore> {
    store: Arc<S>,
}

impl<S: MatchStore> MatchDataRepository<S> {
    /// Wrap a document store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying document store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: MatchStore> Clone for MatchDataRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S: MatchStore> MatchRepository for MatchDataRepository<S> {
    async fn get_match(&self, id: &str) -> StoreResult<Match> {
        let record = self.store.fetch_one(id).await?;
        Ok(record_to_match(&record)?)
    }

    async fn get_matches(&self, filter: &MatchFilter) -> StoreResult<Vec<Match>> {
        let records = self.store.fetch_many(filter).await?;
        let mut matches = Vec::with_capacity(records.len());
        for record in &records {
            matches.push(record_to_match(record)?);
        }
        Ok(matches)
    }

    async fn add_match(&self, m: &Match) -> StoreResult<Match> {
        let record = match_to_record(m)?;
        self.store.insert(&record).await?;
        self.get_match(&record.match_id).await
    }

    async fn add_turn(&self, match_id: &str, turn: &Turn) -> StoreResult<()> {
        let m = self.get_match(match_id).await?;
        if m.game_type != turn.game_type() {
            return Err(DomainError::GameTypeMismatch {
                expected: m.game_type,
                actual: turn.game_type(),
            }
            .into());
        }
        let record = turn_to_record(turn)?;
        self.store.append_turn(match_id, &record).await?;
        Ok(())
    }

    async fn undo_turn(&self, match_id: &str) -> StoreResult<()> {
        self.store.remove_last_turn(match_id).await
    }

    async fn remove_match(&self, id: &str) -> StoreResult<()> {
        self.store.remove(id).await
    }

    async fn update_notes(&self, id: &str, notes: &str) -> StoreResult<()> {
        self.store.update_field(id, MatchField::Notes, notes).await
    }

    async fn update_location(&self, id: &str, location: &str) -> StoreResult<()> {
        self.store.update_field(id, MatchField::Location, location).await
    }
}

// =============================================================================
// Tests
// =============================================================================
