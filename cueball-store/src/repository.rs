//! Repository trait definitions (Ports)
//!
//! Two levels:
//! - [`MatchStore`] speaks storage records and is implemented by document
//!   stores (in-memory, remote).
//! - [`MatchRepository`] speaks domain types and is what use cases depend on.

use std::fmt;

use async_trait::async_trait;
use cueball_codec::{MatchRecord, TurnRecord};
use cueball_domain::{GameType, Match, Ordinal, Turn};

use crate::error::StoreResult;

/// Match fields that can be updated in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    /// Free-form notes
    Notes,
    /// Where the match was played
    Location,
}

impl MatchField {
    /// Field name in the stored document
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Notes => "notes",
            MatchField::Location => "location",
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Selection of matches for `fetch_many`. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// Only matches this player took part in (either side)
    pub player_id: Option<String>,
    /// Only matches of this game type
    pub game_type: Option<GameType>,
}

impl MatchFilter {
    /// Filter on a participant
    pub fn for_player(player_id: impl Into<String>) -> Self {
        Self {
            player_id: Some(player_id.into()),
            ..Self::default()
        }
    }

    /// Restrict to a game type
    pub fn with_game_type(mut self, game_type: GameType) -> Self {
        self.game_type = Some(game_type);
        self
    }

    /// Whether a stored record passes the filter
    pub fn matches(&self, record: &MatchRecord) -> bool {
        let player_ok = self
            .player_id
            .as_deref()
            .map_or(true, |id| record.player_id == id || record.opponent_id == id);
        let game_ok = self
            .game_type
            .map_or(true, |gt| i64::from(record.game_type) == i64::from(gt.ordinal()));
        player_ok && game_ok
    }
}

/// Document-store port over match records.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Load one match record
    async fn fetch_one(&self, id: &str) -> StoreResult<MatchRecord>;

    /// Load every match record passing `filter`, in insertion order
    async fn fetch_many(&self, filter: &MatchFilter) -> StoreResult<Vec<MatchRecord>>;

    /// Store a new match record
    async fn insert(&self, record: &MatchRecord) -> StoreResult<()>;

    /// Append a turn to a match; returns the turn's synthetic key
    async fn append_turn(&self, match_id: &str, turn: &TurnRecord) -> StoreResult<String>;

    /// Remove the most recently appended turn (no-op if there is none)
    async fn remove_last_turn(&self, match_id: &str) -> StoreResult<()>;

    /// Delete a match record
    async fn remove(&self, id: &str) -> StoreResult<()>;

    /// Overwrite a single text field
    async fn update_field(&self, id: &str, field: MatchField, value: &str) -> StoreResult<()>;
}

/// Domain-level repository for matches.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Find a match by id
    async fn get_match(&self, id: &str) -> StoreResult<Match>;

    /// Find matches passing `filter`
    async fn get_matches(&self, filter: &MatchFilter) -> StoreResult<Vec<Match>>;

    /// Save a new match and return it as stored
    async fn add_match(&self, m: &Match) -> StoreResult<Match>;

    /// Record a turn on a match
    async fn add_turn(&self, match_id: &str, turn: &Turn) -> StoreResult<()>;

    /// Drop the last recorded turn of a match
    async fn undo_turn(&self, match_id: &str) -> StoreResult<()>;

    /// Delete a match
    async fn remove_match(&self, id: &str) -> StoreResult<()>;

    /// Replace a match's notes
    async fn update_notes(&self, id: &str, notes: &str) -> StoreResult<()>;

    /// Replace a match's location
    async fn update_location(&self, id: &str, location: &str) -> StoreResult<()>;
}
