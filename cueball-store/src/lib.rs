//! Cueball Storage Layer
//!
//! Persistence for matches and their turns.
//!
//! # Architecture
//!
//! - **MatchStore**: document-store port over storage records
//! - **MatchRepository**: domain-level port used by use cases
//! - **MatchDataRepository**: `MatchRepository` over any `MatchStore`,
//!   mapping through the codec
//! - **MemoryStore**: in-process document store for tests and local runs
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cueball_domain::{GameType, Match, Participant};
//! use cueball_store::{MatchDataRepository, MatchRepository, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let repo = MatchDataRepository::new(Arc::new(MemoryStore::new()));
//!
//!     let player = Participant::new("p1", "Alice").unwrap();
//!     let opponent = Participant::new("p2", "Bob").unwrap();
//!     let m = Match::new(player, opponent, GameType::BcaNineBall).unwrap();
//!
//!     let stored = repo.add_match(&m).await.unwrap();
//!     assert_eq!(stored.id, m.id);
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod data_repository;
mod error;
mod memory;
mod repository;

// Re-exports
pub use data_repository::MatchDataRepository;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repository::{MatchField, MatchFilter, MatchRepository, MatchStore};
