//! Cueball Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the match/turn aggregates, table status and the persisted
//! enumerations whose declaration order is part of the storage format.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod adv_stats;
pub mod entities;
pub mod ordinal;
pub mod table;
pub mod value_objects;

// Re-export commonly used types
pub use adv_stats::{AdvStats, Angle, HowType, ShotType, SubType, UNSET_CUE, UNSET_DISTANCE, UNSET_SPEED};
pub use entities::{Match, Participant, StatsDetail, Turn, DEFAULT_MAX_ATTEMPTS_PER_GAME, DEFAULT_RANK};
pub use ordinal::Ordinal;
pub use table::TableStatus;
pub use value_objects::{BallStatus, BreakType, DomainError, GameType, PlayerTurn, TurnEnd};
