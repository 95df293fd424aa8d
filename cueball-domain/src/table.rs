//! Table status: the state of every ball at the end of a turn.

use crate::value_objects::{BallStatus, DomainError, GameType};

// =============================================================================
// TableStatus
// =============================================================================

/// Ordered ball states for one table, tagged with the game being played.
///
/// Balls are numbered from 1. The number of balls is fixed by the game type.
///
/// # Invariants
/// - `balls.len() == game_type.table_size()`
/// - `game_type` has a table layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    game_type: GameType,
    balls: Vec<BallStatus>,
}

impl TableStatus {
    /// Create a table with every ball on it.
    ///
    /// # Errors
    /// Returns `DomainError::UnsupportedGameType` if the game type has no table
    pub fn new(game_type: GameType) -> Result<Self, DomainError> {
        let size = Self::size_of(game_type)?;
        Ok(Self {
            game_type,
            balls: vec![BallStatus::OnTable; size],
        })
    }

    /// Create a table where only `on_table` balls remain, every other ball is off.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBall` if a listed ball is not on this table
    pub fn with_balls_on_table(game_type: GameType, on_table: &[usize]) -> Result<Self, DomainError> {
        let size = Self::size_of(game_type)?;
        let mut table = Self {
            game_type,
            balls: vec![BallStatus::OffTable; size],
        };
        table.set_balls(BallStatus::OnTable, on_table)?;
        Ok(table)
    }

    /// Build a table from previously recorded ball states (position 1 first).
    ///
    /// # Errors
    /// - `DomainError::UnsupportedGameType` if the game type has no table
    /// - `DomainError::InvalidTableSize` if the ball count is wrong for the game type
    pub fn from_parts(game_type: GameType, balls: Vec<BallStatus>) -> Result<Self, DomainError> {
        let expected = Self::size_of(game_type)?;
        if balls.len() != expected {
            return Err(DomainError::InvalidTableSize {
                game_type,
                expected,
                actual: balls.len(),
            });
        }
        Ok(Self { game_type, balls })
    }

    fn size_of(game_type: GameType) -> Result<usize, DomainError> {
        game_type
            .table_size()
            .ok_or(DomainError::UnsupportedGameType(game_type))
    }

    /// Game type of this table
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Number of balls on a full rack
    pub fn size(&self) -> usize {
        self.balls.len()
    }

    /// Ball states in ball-number order
    pub fn balls(&self) -> &[BallStatus] {
        &self.balls
    }

    /// Split into game type and ball states
    pub fn into_parts(self) -> (GameType, Vec<BallStatus>) {
        (self.game_type, self.balls)
    }

    /// Number of the game-winning ball
    pub fn game_ball(&self) -> usize {
        // from_parts/new reject game types without a layout
        self.game_type.game_ball().unwrap_or(self.balls.len())
    }

    /// State of ball `ball` (1-based).
    ///
    /// # Errors
    /// Returns `DomainError::InvalidBall` if the ball is not on this table
    pub fn ball(&self, ball: usize) -> Result<BallStatus, DomainError> {
        let index = self.index_of(ball)?;
        Ok(self.balls[index])
    }

    /// Set the state of a single ball.
    pub fn set_ball(&mut self, status: BallStatus, ball: usize) -> Result<(), DomainError> {
        let index = self.index_of(ball)?;
        self.balls[index] = status;
        Ok(())
    }

    /// Set several balls to the same state.
    ///
    /// Validates every ball before changing anything.
    pub fn set_balls(&mut self, status: BallStatus, balls: &[usize]) -> Result<(), DomainError> {
        let indexes = balls
            .iter()
            .map(|&ball| self.index_of(ball))
            .collect::<Result<Vec<_>, _>>()?;
        for index in indexes {
            self.balls[index] = status;
        }
        Ok(())
    }

    fn index_of(&self, ball: usize) -> Result<usize, DomainError> {
        if ball == 0 || ball > self.balls.len() {
            return Err(DomainError::InvalidBall {
                ball,
                size: self.balls.len(),
            });
        }
        Ok(ball - 1)
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    fn count(&self, status: BallStatus) -> usize {
        self.balls.iter().filter(|&&b| b == status).count()
    }

    fn game_ball_status(&self) -> Option<BallStatus> {
        self.game_ball()
            .checked_sub(1)
            .and_then(|index| self.balls.get(index))
            .copied()
    }

    fn game_ball_is(&self, statuses: &[BallStatus]) -> bool {
        self.game_ball_status()
            .map(|status| statuses.contains(&status))
            .unwrap_or(false)
    }

    /// Balls still on the table
    pub fn balls_remaining(&self) -> usize {
        self.count(BallStatus::OnTable)
    }

    /// Numbers of balls that are no longer on the table
    pub fn balls_off_table(&self) -> Vec<usize> {
        self.balls
            .iter()
            .enumerate()
            .filter(|(_, &status)| status != BallStatus::OnTable)
            .map(|(index, _)| index + 1)
            .collect()
    }

    /// Balls pocketed on fouls after the break
    pub fn dead_balls(&self) -> usize {
        self.count(BallStatus::Dead)
            + usize::from(self.game_ball_is(&[BallStatus::GameBallMadeOnBreakThenDead]))
    }

    /// Balls pocketed on a foul break
    pub fn dead_balls_on_break(&self) -> usize {
        self.count(BallStatus::DeadOnBreak)
            + usize::from(self.game_ball_is(&[
                BallStatus::GameBallDeadOnBreak,
                BallStatus::GameBallDeadOnBreakThenMade,
                BallStatus::GameBallDeadOnBreakThenDead,
            ]))
    }

    /// Balls pocketed on a legal break
    pub fn break_balls_made(&self) -> usize {
        self.count(BallStatus::MadeOnBreak)
            + usize::from(self.game_ball_is(&[
                BallStatus::GameBallMadeOnBreak,
                BallStatus::GameBallMadeOnBreakThenMade,
                BallStatus::GameBallMadeOnBreakThenDead,
            ]))
    }

    /// Balls pocketed legally after the break
    pub fn shooting_balls_made(&self) -> usize {
        self.count(BallStatus::Made)
            + usize::from(self.game_ball_is(&[
                BallStatus::GameBallMadeOnBreakThenMade,
                BallStatus::GameBallDeadOnBreakThenMade,
            ]))
    }

    /// Game ball pocketed legally while shooting
    pub fn is_game_ball_made(&self) -> bool {
        self.game_ball_is(&[
            BallStatus::Made,
            BallStatus::GameBallMadeOnBreakThenMade,
            BallStatus::GameBallDeadOnBreakThenMade,
        ])
    }

    /// Game ball pocketed on the break
    pub fn is_game_ball_made_on_break(&self) -> bool {
        self.game_ball_is(&[
            BallStatus::MadeOnBreak,
            BallStatus::GameBallMadeOnBreak,
            BallStatus::GameBallMadeOnBreakThenDead,
            BallStatus::GameBallMadeOnBreakThenMade,
        ])
    }

    /// Game ball pocketed on a foul
    pub fn is_game_ball_made_illegally(&self) -> bool {
        self.game_ball_is(&[
            BallStatus::Dead,
            BallStatus::GameBallMadeOnBreakThenDead,
            BallStatus::GameBallDeadOnBreak,
        ])
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_all_on() {
        let table = TableStatus::new(GameType::BcaNineBall).unwrap();

        assert_eq!(table.size(), 9);
        assert_eq!(table.balls_remaining(), 9);
        assert_eq!(table.game_ball(), 9);
        assert!(table.balls_off_table().is_empty());
    }

    #[test]
    fn test_new_table_unsupported() {
        let err = TableStatus::new(GameType::AmericanRotation).unwrap_err();
        assert_eq!(err, DomainError::UnsupportedGameType(GameType::AmericanRotation));
    }

    #[test]
    fn test_from_parts_rejects_wrong_size() {
        let err = TableStatus::from_parts(GameType::BcaTenBall, vec![BallStatus::OnTable; 9])
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidTableSize {
                game_type: GameType::BcaTenBall,
                expected: 10,
                actual: 9,
            }
        );
    }

    #[test]
    fn test_ball_numbering_is_one_based() {
        let mut table = TableStatus::new(GameType::BcaEightBall).unwrap();

        table.set_ball(BallStatus::Made, 1).unwrap();
        table.set_ball(BallStatus::Dead, 15).unwrap();

        assert_eq!(table.ball(1).unwrap(), BallStatus::Made);
        assert_eq!(table.balls()[14], BallStatus::Dead);
        assert!(table.ball(0).is_err());
        assert!(table.ball(16).is_err());
    }

    #[test]
    fn test_set_balls_is_all_or_nothing() {
        let mut table = TableStatus::new(GameType::BcaNineBall).unwrap();

        let result = table.set_balls(BallStatus::Made, &[1, 2, 10]);

        assert_eq!(result, Err(DomainError::InvalidBall { ball: 10, size: 9 }));
        assert_eq!(table.balls_remaining(), 9);
    }

    #[test]
    fn test_with_balls_on_table() {
        let table = TableStatus::with_balls_on_table(GameType::ApaNineBall, &[3, 9]).unwrap();

        assert_eq!(table.balls_remaining(), 2);
        assert_eq!(table.balls_off_table(), vec![1, 2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_break_and_shooting_counts() {
        let mut table = TableStatus::new(GameType::BcaNineBall).unwrap();
        table.set_balls(BallStatus::MadeOnBreak, &[1, 4]).unwrap();
        table.set_ball(BallStatus::DeadOnBreak, 6).unwrap();
        table.set_balls(BallStatus::Made, &[2, 3]).unwrap();
        table.set_ball(BallStatus::GameBallMadeOnBreakThenMade, 9).unwrap();

        assert_eq!(table.break_balls_made(), 3);
        assert_eq!(table.shooting_balls_made(), 3);
        assert_eq!(table.dead_balls_on_break(), 1);
        assert_eq!(table.dead_balls(), 0);
        assert!(table.is_game_ball_made());
        assert!(table.is_game_ball_made_on_break());
        assert!(!table.is_game_ball_made_illegally());
    }

    #[test]
    fn test_game_ball_made_illegally() {
        let mut table = TableStatus::new(GameType::BcaEightBall).unwrap();
        table.set_ball(BallStatus::Dead, 8).unwrap();

        assert!(table.is_game_ball_made_illegally());
        assert!(!table.is_game_ball_made());
        assert_eq!(table.dead_balls(), 1);
    }
}
