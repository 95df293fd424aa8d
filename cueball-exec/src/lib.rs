//! Cueball Execution Engine
//!
//! Runs units of work off the caller's thread and delivers their results
//! on a single completion context, with per-operation and group
//! cancellation.
//!
//! # Architecture
//!
//! ```text
//! caller ──execute──► Executor ──submit──► WorkerPool (worker threads)
//!                        │                       │
//!                    TaskGroup                 Work stream
//!                        │                       │
//!                   cancel_all            CompletionContext ──► Observer
//! ```
//!
//! # Components
//!
//! - **Pool**: `WorkerPool` trait, `JobExecutor` (bounded runtime), `HandlePool`
//! - **Completion**: `CompletionContext` trait and a single-threaded loop
//! - **Operation**: lifecycle state machine and cancellation handle
//! - **Group**: registry of live operations for `cancel_all`
//! - **Executor**: ties the above together
//! - **Stub**: test implementations for development
//!
//! # Guarantees
//!
//! - Each operation delivers at most one terminal event.
//! - Once `cancel` or `cancel_all` returns, no handler of the cancelled
//!   operations runs (when called from the completion context or after
//!   any in-progress handler returns).
//! - `cancel_all` is idempotent and leaves the group empty.
//! - Work that panics fails with an `Other` upstream error.
//!
//! # Example
//!
//! ```rust,ignore
//! use cueball_exec::{completion_loop, single, Executor, JobExecutor, PoolConfig};
//! use std::sync::Arc;
//!
//! let pool = Arc::new(JobExecutor::new(PoolConfig::default())?);
//! let (context, main_loop) = completion_loop();
//! let executor = Executor::new(pool, Arc::new(context));
//!
//! executor.execute(single(async { Ok(42) }), observer);
//! main_loop.run_pending();
//!
//! executor.cancel_all();
//! ```

#![warn(clippy::all)]

pub mod completion;
pub mod error;
pub mod executor;
pub mod group;
pub mod observer;
pub mod operation;
pub mod pool;
pub mod stub;
pub mod work;

// Re-exports for convenience
pub use completion::{completion_loop, Callback, CompletionContext, CompletionLoop, LoopContext};
pub use error::{ExecError, ExecResult, FailureKind};
pub use executor::Executor;
pub use group::TaskGroup;
pub use observer::{DefaultObserver, Observer};
pub use operation::{OperationHandle, OperationId, OperationState};
pub use pool::{HandlePool, Job, JobExecutor, PoolConfig, WorkerPool};
pub use stub::{QueuedPool, Recorded, RecordingObserver};
pub use work::{completion, from_results, single, Work};
