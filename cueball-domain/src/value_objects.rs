//! Value Objects for the Cueball Domain
//!
//! Game-level enumerations shared by tables, turns and matches.
//! All of them are persisted by ordinal, see [`crate::ordinal`].

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{EnumCount, EnumIter};

use crate::ordinal::impl_ordinal;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Game type has no table layout
    #[error("Unsupported game type: {0}")]
    UnsupportedGameType(GameType),

    /// Ball count does not match the game type's table
    #[error("Invalid table size for {game_type}: expected {expected} balls, got {actual}")]
    InvalidTableSize {
        /// Game type of the table
        game_type: GameType,
        /// Number of balls the game type requires
        expected: usize,
        /// Number of balls supplied
        actual: usize,
    },

    /// Ball number outside `1..=size`
    #[error("Invalid ball: {ball} is out of range (1-{size})")]
    InvalidBall {
        /// Requested ball number
        ball: usize,
        /// Table size
        size: usize,
    },

    /// Turn recorded for a different game than the match
    #[error("Game type mismatch: match is {expected}, turn is {actual}")]
    GameTypeMismatch {
        /// Game type of the match
        expected: GameType,
        /// Game type of the rejected turn
        actual: GameType,
    },

    /// Participant validation error
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
}

// =============================================================================
// GameType
// =============================================================================

/// Variant of pool being played.
///
/// Persisted by ordinal. Append new variants at the end.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    /// BCA rules 8-ball
    #[default]
    BcaEightBall,
    /// BCA rules 10-ball
    BcaTenBall,
    /// BCA rules 9-ball
    BcaNineBall,
    /// BCA 8-ball against the ghost
    BcaGhostEightBall,
    /// BCA 9-ball against the ghost
    BcaGhostNineBall,
    /// BCA 10-ball against the ghost
    BcaGhostTenBall,
    /// 14.1 continuous
    StraightPool,
    /// American rotation (no table layout)
    AmericanRotation,
    /// APA rules 9-ball
    ApaNineBall,
    /// APA rules 8-ball
    ApaEightBall,
    /// APA 8-ball against the ghost
    ApaGhostEightBall,
    /// APA 9-ball against the ghost
    ApaGhostNineBall,
    /// Straight pool against the ghost
    StraightGhost,
    /// Equal offense drill (no table layout)
    EqualOffense,
    /// Equal defense drill (no table layout)
    EqualDefense,
    /// Filter value matching every game type
    All,
}

impl_ordinal!(GameType);

impl GameType {
    /// Number of balls on the table, not counting the cue ball.
    ///
    /// `None` for game types that have no table layout.
    pub fn table_size(self) -> Option<usize> {
        if self.is_eight_ball() {
            Some(15)
        } else if self.is_nine_ball() {
            Some(9)
        } else if self.is_ten_ball() {
            Some(10)
        } else if self.is_straight_pool() {
            Some(999)
        } else {
            None
        }
    }

    /// Number of the ball that wins the game when pocketed.
    pub fn game_ball(self) -> Option<usize> {
        if self.is_eight_ball() {
            Some(8)
        } else if self.is_nine_ball() {
            Some(9)
        } else if self.is_ten_ball() {
            Some(10)
        } else if self.is_straight_pool() {
            Some(999)
        } else {
            None
        }
    }

    /// APA ruleset
    pub fn is_apa(self) -> bool {
        matches!(
            self,
            Self::ApaEightBall | Self::ApaNineBall | Self::ApaGhostEightBall | Self::ApaGhostNineBall
        )
    }

    /// BCA ruleset
    pub fn is_bca(self) -> bool {
        matches!(
            self,
            Self::BcaEightBall
                | Self::BcaNineBall
                | Self::BcaTenBall
                | Self::BcaGhostEightBall
                | Self::BcaGhostNineBall
                | Self::BcaGhostTenBall
        )
    }

    /// Single player game against the ghost
    pub fn is_ghost(self) -> bool {
        matches!(
            self,
            Self::BcaGhostEightBall
                | Self::BcaGhostNineBall
                | Self::BcaGhostTenBall
                | Self::ApaGhostEightBall
                | Self::ApaGhostNineBall
                | Self::StraightGhost
        )
    }

    /// Any 8-ball variant
    pub fn is_eight_ball(self) -> bool {
        matches!(
            self,
            Self::BcaEightBall | Self::BcaGhostEightBall | Self::ApaEightBall | Self::ApaGhostEightBall
        )
    }

    /// Any 9-ball variant
    pub fn is_nine_ball(self) -> bool {
        matches!(
            self,
            Self::BcaNineBall | Self::BcaGhostNineBall | Self::ApaNineBall | Self::ApaGhostNineBall
        )
    }

    /// Any 10-ball variant
    pub fn is_ten_ball(self) -> bool {
        matches!(self, Self::BcaTenBall | Self::BcaGhostTenBall)
    }

    /// Straight pool, with or without the ghost
    pub fn is_straight_pool(self) -> bool {
        matches!(self, Self::StraightPool | Self::StraightGhost)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BcaEightBall => "BCA 8-ball",
            Self::BcaTenBall => "BCA 10-ball",
            Self::BcaNineBall => "BCA 9-ball",
            Self::BcaGhostEightBall => "BCA ghost 8-ball",
            Self::BcaGhostNineBall => "BCA ghost 9-ball",
            Self::BcaGhostTenBall => "BCA ghost 10-ball",
            Self::StraightPool => "straight pool",
            Self::AmericanRotation => "american rotation",
            Self::ApaNineBall => "APA 9-ball",
            Self::ApaEightBall => "APA 8-ball",
            Self::ApaGhostEightBall => "APA ghost 8-ball",
            Self::ApaGhostNineBall => "APA ghost 9-ball",
            Self::StraightGhost => "straight pool ghost",
            Self::EqualOffense => "equal offense",
            Self::EqualDefense => "equal defense",
            Self::All => "all",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// BallStatus
// =============================================================================

/// State of a single ball at the end of a turn.
///
/// Persisted by ordinal inside the table-status string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BallStatus {
    /// Still on the table
    #[default]
    OnTable,
    /// Removed before this turn
    OffTable,
    /// Pocketed legally while shooting
    Made,
    /// Pocketed on a foul
    Dead,
    /// Pocketed on the break
    MadeOnBreak,
    /// Pocketed on a foul break
    DeadOnBreak,
    /// Game ball pocketed on the break
    GameBallMadeOnBreak,
    /// Game ball made on the break, spotted, then made
    GameBallMadeOnBreakThenMade,
    /// Game ball made on the break, spotted, then dead
    GameBallMadeOnBreakThenDead,
    /// Game ball pocketed on a foul break
    GameBallDeadOnBreak,
    /// Game ball dead on the break, spotted, then made
    GameBallDeadOnBreakThenMade,
    /// Game ball dead on the break, spotted, then dead
    GameBallDeadOnBreakThenDead,
}

impl_ordinal!(BallStatus);

// =============================================================================
// TurnEnd
// =============================================================================

/// How a turn ended.
///
/// Persisted by ordinal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnEnd {
    /// Safety attempt that left a shot
    SafetyError,
    /// Missed shot
    Miss,
    /// Nothing made on the break
    BreakMiss,
    /// Game won
    GameWon,
    /// Intentional safety
    Safety,
    /// Push out
    PushShot,
    /// Turn passed back without shooting
    SkipTurn,
    /// Current player breaks again
    CurrentPlayerBreaksAgain,
    /// Opponent breaks again
    OpponentBreaksAgain,
    /// Play continues in the current game
    ContinueWithGame,
    /// Turn passes to the other player
    ChangeTurn,
    /// Illegal break
    IllegalBreak,
}

impl_ordinal!(TurnEnd);

// =============================================================================
// BreakType / PlayerTurn
// =============================================================================

/// Who breaks after a game ends.
///
/// Persisted by ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakType {
    /// Winner of the previous game breaks
    Winner,
    /// Loser of the previous game breaks
    Loser,
    /// Players alternate breaks
    #[default]
    Alternate,
    /// The player always breaks
    Player,
    /// The opponent always breaks
    Opponent,
}

impl_ordinal!(BreakType);

/// Side of the match whose turn it is.
///
/// Persisted by ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerTurn {
    /// The tracked player
    #[default]
    Player,
    /// The opponent
    Opponent,
}

impl_ordinal!(PlayerTurn);

impl PlayerTurn {
    /// The other side
    pub fn next(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordinal::Ordinal;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_game_type_ordinals_are_stable() {
        assert_eq!(GameType::BcaEightBall.ordinal(), 0);
        assert_eq!(GameType::BcaNineBall.ordinal(), 2);
        assert_eq!(GameType::StraightPool.ordinal(), 6);
        assert_eq!(GameType::ApaNineBall.ordinal(), 8);
        assert_eq!(GameType::All.ordinal(), 15);
        assert_eq!(GameType::COUNT, 16);
    }

    #[test]
    fn test_ball_status_ordinals_are_stable() {
        assert_eq!(BallStatus::OnTable.ordinal(), 0);
        assert_eq!(BallStatus::Made.ordinal(), 2);
        assert_eq!(BallStatus::GameBallDeadOnBreakThenDead.ordinal(), 11);
        assert_eq!(BallStatus::COUNT, 12);
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(GameType::BcaEightBall.table_size(), Some(15));
        assert_eq!(GameType::ApaGhostNineBall.table_size(), Some(9));
        assert_eq!(GameType::BcaGhostTenBall.table_size(), Some(10));
        assert_eq!(GameType::StraightGhost.table_size(), Some(999));
        assert_eq!(GameType::AmericanRotation.table_size(), None);
        assert_eq!(GameType::All.game_ball(), None);
    }

    #[test]
    fn test_every_table_has_a_game_ball_in_range() {
        for game_type in GameType::iter() {
            match (game_type.table_size(), game_type.game_ball()) {
                (Some(size), Some(ball)) => assert!(ball <= size, "{game_type}"),
                (None, None) => {},
                other => panic!("inconsistent layout for {game_type}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_rulesets_are_disjoint() {
        for game_type in GameType::iter() {
            assert!(!(game_type.is_apa() && game_type.is_bca()), "{game_type}");
        }
        assert!(GameType::StraightGhost.is_ghost());
        assert!(!GameType::StraightPool.is_ghost());
    }

    #[test]
    fn test_player_turn_next() {
        assert_eq!(PlayerTurn::Player.next(), PlayerTurn::Opponent);
        assert_eq!(PlayerTurn::Opponent.next().next(), PlayerTurn::Opponent);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&GameType::BcaNineBall).unwrap();
        assert_eq!(json, "\"BCA_NINE_BALL\"");
    }
}
