//! Domain Entities for Cueball
//!
//! Entities have identity and lifecycle.
//! A `Match` owns its ordered `Turn`s; a `Turn` owns its table status and
//! advanced statistics.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{EnumCount, EnumIter};
use uuid::Uuid;

use crate::adv_stats::AdvStats;
use crate::ordinal::impl_ordinal;
use crate::table::TableStatus;
use crate::value_objects::{BreakType, DomainError, GameType, PlayerTurn, TurnEnd};

/// Rank given to participants when none is supplied
pub const DEFAULT_RANK: i32 = 100;

/// Attempts per game allowed in ghost matches unless configured
pub const DEFAULT_MAX_ATTEMPTS_PER_GAME: i32 = 1;

// =============================================================================
// Turn
// =============================================================================

/// One player's visit to the table.
///
/// Immutable once appended to a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// How the turn ended
    pub turn_end: TurnEnd,
    /// Table at the end of the turn
    pub table: TableStatus,
    /// Turn ended on a foul
    pub foul: bool,
    /// Foul that loses the game outright
    pub serious_foul: bool,
    /// Shot details
    pub adv_stats: AdvStats,
}

impl Turn {
    /// Create a new turn
    pub fn new(
        turn_end: TurnEnd,
        table: TableStatus,
        foul: bool,
        serious_foul: bool,
        adv_stats: AdvStats,
    ) -> Self {
        Self {
            turn_end,
            table,
            foul,
            serious_foul,
            adv_stats,
        }
    }

    /// Game type of the table this turn was played on
    pub fn game_type(&self) -> GameType {
        self.table.game_type()
    }

    /// Id of the player who took the turn
    pub fn player_id(&self) -> &str {
        &self.adv_stats.player
    }

    /// A serious foul loses the game in every game except straight pool
    pub fn is_game_lost(&self) -> bool {
        self.game_type() != GameType::StraightPool && self.serious_foul
    }
}

// =============================================================================
// Participant
// =============================================================================

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable player id
    pub id: String,
    /// Display name
    pub name: String,
    /// Handicap rank
    pub rank: i32,
}

impl Participant {
    /// Create a participant with the default rank.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidParticipant` if the id is blank
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidParticipant("Participant id must not be empty".to_string()));
        }
        Ok(Self {
            id,
            name: name.into(),
            rank: DEFAULT_RANK,
        })
    }

    /// Set the handicap rank
    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }
}

// =============================================================================
// StatsDetail
// =============================================================================

/// Optional statistic categories a match chooses to track.
///
/// Persisted as a bitmask of ordinals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatsDetail {
    /// Legacy: basic stats
    Normal,
    /// Legacy: advanced stats for both sides
    Advanced,
    /// Legacy: advanced stats for the player
    AdvancedPlayer,
    /// Legacy: advanced stats for the opponent
    AdvancedOpponent,
    /// Shot types, player
    ShotTypePlayer,
    /// Shot types, opponent
    ShotTypeOpponent,
    /// Cue contact, player
    CueingPlayer,
    /// Cue contact, opponent
    CueingOpponent,
    /// Miss reasons, player
    HowMissPlayer,
    /// Miss reasons, opponent
    HowMissOpponent,
    /// Safeties, player
    SafetiesPlayer,
    /// Safeties, opponent
    SafetiesOpponent,
    /// Speed, player
    SpeedPlayer,
    /// Speed, opponent
    SpeedOpponent,
    /// Ball distances, player
    BallDistancesPlayer,
    /// Ball distances, opponent
    BallDistancesOpponent,
    /// Simple angles, player
    AngleSimplePlayer,
    /// Simple angles, opponent
    AngleSimpleOpponent,
    /// Cut angles, player
    AnglePlayer,
    /// Cut angles, opponent
    AngleOpponent,
}

impl_ordinal!(StatsDetail);

impl StatsDetail {
    /// Categories kept for reading old matches only
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            Self::Normal | Self::Advanced | Self::AdvancedPlayer | Self::AdvancedOpponent
        )
    }

    /// Categories tracked for the player
    pub fn player_details() -> BTreeSet<StatsDetail> {
        [
            Self::ShotTypePlayer,
            Self::CueingPlayer,
            Self::HowMissPlayer,
            Self::SafetiesPlayer,
            Self::SpeedPlayer,
            Self::BallDistancesPlayer,
            Self::AngleSimplePlayer,
            Self::AnglePlayer,
        ]
        .into_iter()
        .collect()
    }

    /// Categories tracked for the opponent
    pub fn opponent_details() -> BTreeSet<StatsDetail> {
        [
            Self::ShotTypeOpponent,
            Self::CueingOpponent,
            Self::HowMissOpponent,
            Self::SafetiesOpponent,
            Self::SpeedOpponent,
            Self::BallDistancesOpponent,
            Self::AngleSimpleOpponent,
            Self::AngleOpponent,
        ]
        .into_iter()
        .collect()
    }
}

// =============================================================================
// Match
// =============================================================================

/// A match between two participants.
///
/// Turns form an append-only log with single-step undo.
///
/// # Invariants
/// - Every turn is played on the match's game type
/// - `created_at` has millisecond precision (the stored form)
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Unique identifier
    pub id: String,
    /// The tracked player
    pub player: Participant,
    /// The opponent (the ghost in single player games)
    pub opponent: Participant,
    /// Game being played
    pub game_type: GameType,
    /// Who shoots first
    pub first_turn: PlayerTurn,
    /// Who breaks after each game
    pub break_type: BreakType,
    /// Free-form notes
    pub notes: String,
    /// Where the match was played
    pub location: String,
    /// When the match was created
    pub created_at: DateTime<Utc>,
    /// Extra statistic categories tracked
    pub details: BTreeSet<StatsDetail>,
    /// Attempts per game in ghost matches
    pub max_attempts_per_game: i32,
    turns: Vec<Turn>,
}

impl Match {
    /// Create a new match with no turns.
    ///
    /// # Errors
    /// Returns `DomainError::UnsupportedGameType` if the game type has no table
    pub fn new(player: Participant, opponent: Participant, game_type: GameType) -> Result<Self, DomainError> {
        if game_type.table_size().is_none() {
            return Err(DomainError::UnsupportedGameType(game_type));
        }

        Ok(Self {
            id: Uuid::now_v7().to_string(),
            player,
            opponent,
            game_type,
            first_turn: PlayerTurn::default(),
            break_type: BreakType::default(),
            notes: String::new(),
            location: String::new(),
            created_at: Utc::now().trunc_subsecs(3),
            details: BTreeSet::new(),
            max_attempts_per_game: DEFAULT_MAX_ATTEMPTS_PER_GAME,
            turns: Vec::new(),
        })
    }

    /// Replace the generated id (used when loading stored matches)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set who shoots first
    pub fn with_first_turn(mut self, first_turn: PlayerTurn) -> Self {
        self.first_turn = first_turn;
        self
    }

    /// Set the break rotation
    pub fn with_break_type(mut self, break_type: BreakType) -> Self {
        self.break_type = break_type;
        self
    }

    /// Set notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the creation time, truncated to milliseconds
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at.trunc_subsecs(3);
        self
    }

    /// Set tracked statistic categories
    pub fn with_details(mut self, details: impl IntoIterator<Item = StatsDetail>) -> Self {
        self.details = details.into_iter().collect();
        self
    }

    /// Set attempts per game for ghost matches
    pub fn with_max_attempts_per_game(mut self, attempts: i32) -> Self {
        self.max_attempts_per_game = attempts;
        self
    }

    /// Append a turn.
    ///
    /// # Errors
    /// Returns `DomainError::GameTypeMismatch` if the turn was played on another game
    pub fn add_turn(&mut self, turn: Turn) -> Result<(), DomainError> {
        if turn.game_type() != self.game_type {
            return Err(DomainError::GameTypeMismatch {
                expected: self.game_type,
                actual: turn.game_type(),
            });
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Remove and return the most recent turn
    pub fn undo_turn(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    /// Turns in the order they were played
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn
    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns played
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Whether the given player takes part in this match
    pub fn involves(&self, player_id: &str) -> bool {
        self.player.id == player_id || self.opponent.id == player_id
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordinal::Ordinal;
    use crate::value_objects::BallStatus;
    use strum::EnumCount;

    fn participants() -> (Participant, Participant) {
        (
            Participant::new("p1", "Alice").unwrap(),
            Participant::new("p2", "Bob").unwrap().with_rank(55),
        )
    }

    fn turn(game_type: GameType, player: &str) -> Turn {
        Turn::new(
            TurnEnd::Miss,
            TableStatus::new(game_type).unwrap(),
            false,
            false,
            AdvStats::new(player),
        )
    }

    #[test]
    fn test_new_match_defaults() {
        let (player, opponent) = participants();
        let m = Match::new(player, opponent, GameType::BcaNineBall).unwrap();

        assert_eq!(m.player.rank, DEFAULT_RANK);
        assert_eq!(m.opponent.rank, 55);
        assert_eq!(m.break_type, BreakType::Alternate);
        assert_eq!(m.first_turn, PlayerTurn::Player);
        assert_eq!(m.max_attempts_per_game, 1);
        assert_eq!(m.turn_count(), 0);
        assert_eq!(m.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(Uuid::parse_str(&m.id).is_ok());
    }

    #[test]
    fn test_new_match_unsupported_game() {
        let (player, opponent) = participants();
        let err = Match::new(player, opponent, GameType::EqualDefense).unwrap_err();

        assert_eq!(err, DomainError::UnsupportedGameType(GameType::EqualDefense));
    }

    #[test]
    fn test_participant_requires_id() {
        assert!(Participant::new("  ", "Nobody").is_err());
    }

    #[test]
    fn test_add_and_undo_turns() {
        let (player, opponent) = participants();
        let mut m = Match::new(player, opponent, GameType::BcaNineBall).unwrap();

        m.add_turn(turn(GameType::BcaNineBall, "p1")).unwrap();
        let mut second = turn(GameType::BcaNineBall, "p2");
        second.table.set_ball(BallStatus::Made, 1).unwrap();
        m.add_turn(second.clone()).unwrap();

        assert_eq!(m.turn_count(), 2);
        assert_eq!(m.last_turn().unwrap().player_id(), "p2");
        assert_eq!(m.undo_turn(), Some(second));
        assert_eq!(m.turn_count(), 1);
    }

    #[test]
    fn test_undo_on_empty_match() {
        let (player, opponent) = participants();
        let mut m = Match::new(player, opponent, GameType::BcaEightBall).unwrap();

        assert_eq!(m.undo_turn(), None);
    }

    #[test]
    fn test_add_turn_rejects_other_game() {
        let (player, opponent) = participants();
        let mut m = Match::new(player, opponent, GameType::BcaNineBall).unwrap();

        let err = m.add_turn(turn(GameType::BcaTenBall, "p1")).unwrap_err();

        assert!(matches!(err, DomainError::GameTypeMismatch { .. }));
        assert_eq!(m.turn_count(), 0);
    }

    #[test]
    fn test_serious_foul_loses_game() {
        let mut t = turn(GameType::BcaEightBall, "p1");
        t.serious_foul = true;
        assert!(t.is_game_lost());

        let mut straight = turn(GameType::StraightPool, "p1");
        straight.serious_foul = true;
        assert!(!straight.is_game_lost());
    }

    #[test]
    fn test_stats_detail_groups() {
        assert_eq!(StatsDetail::COUNT, 20);
        assert_eq!(StatsDetail::AngleOpponent.ordinal(), 19);
        assert!(StatsDetail::player_details().is_disjoint(&StatsDetail::opponent_details()));
        assert!(StatsDetail::player_details().iter().all(|d| !d.is_legacy()));
    }
}
