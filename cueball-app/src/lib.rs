//! Cueball Application Layer
//!
//! Use-case façades over the match repository, run through the execution
//! engine.
//!
//! # Architecture
//!
//! ```text
//! caller → Interactor<UseCase> → Executor → WorkerPool
//!                                    │            │
//!                                    │     MatchRepository → MatchStore
//!                                    ▼
//!                          CompletionContext → Observer
//! ```
//!
//! # Components
//!
//! - **Use cases**: AddMatch, GetMatch, GetMatchesList, AddTurn, UndoTurn,
//!   DeleteMatch, UpdateMatchNotes, UpdateMatchLocation
//! - **Interactor**: runs a use case and cancels what it started on `dispose`
//! - **Error**: application errors and user-facing messages
//! - **Config**: Environment-based configuration
//! - **Import**: match-record files and summaries for the `cueball` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use cueball_app::{AddMatch, Interactor};
//! use cueball_exec::{completion_loop, JobExecutor, PoolConfig};
//! use cueball_store::{MatchDataRepository, MemoryStore};
//! use std::sync::Arc;
//!
//! let repository = Arc::new(MatchDataRepository::new(Arc::new(MemoryStore::new())));
//! let pool = Arc::new(JobExecutor::new(PoolConfig::default())?);
//! let (context, main_loop) = completion_loop();
//!
//! let add_match = Interactor::new(AddMatch::new(repository), pool, Arc::new(context));
//! add_match.execute(new_match, observer);
//! main_loop.run_pending();
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod import;
pub mod use_cases;

// Re-exports for convenience
pub use config::{Config, Environment};
pub use error::{failure_kind, upstream, user_message, AppError, AppResult, UNKNOWN_ERROR};
pub use import::{load_match_file, match_summary, parse_match};
pub use use_cases::{
    AddMatch, AddTurn, DeleteMatch, FieldUpdate, GetMatch, GetMatchesList, Interactor, TurnParams,
    UndoTurn, UpdateMatchLocation, UpdateMatchNotes, UseCase,
};
