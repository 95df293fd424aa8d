//! Completion contexts.
//!
//! A completion context is the one place where result handlers run,
//! whichever worker produced the result. [`completion_loop`] provides a
//! single-threaded context drained by a dedicated thread (or by a test).

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{ExecError, ExecResult};

/// A deferred result-handler invocation
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Where result handlers run.
pub trait CompletionContext: Send + Sync + 'static {
    /// Schedule `callback` on this context.
    ///
    /// Callbacks posted from one thread run in the order they were posted.
    ///
    /// # Errors
    /// Returns `ExecError::Rejected` if the context no longer runs
    /// callbacks. The callback is dropped in that case.
    fn run_on(&self, callback: Callback) -> ExecResult<()>;
}

/// Create a connected context/loop pair.
///
/// Post through the [`LoopContext`]; run callbacks by draining the
/// [`CompletionLoop`] on the thread that should own result handling.
pub fn completion_loop() -> (LoopContext, CompletionLoop) {
    let (sender, receiver) = mpsc::channel();
    (
        LoopContext { sender },
        CompletionLoop { receiver },
    )
}

// =============================================================================
// LoopContext
// =============================================================================

/// Posting side of a completion loop.
#[derive(Clone)]
pub struct LoopContext {
    sender: Sender<Callback>,
}

impl CompletionContext for LoopContext {
    fn run_on(&self, callback: Callback) -> ExecResult<()> {
        self.sender
            .send(callback)
            .map_err(|_| ExecError::Rejected("completion loop is gone".to_string()))
    }
}

// =============================================================================
// CompletionLoop
// =============================================================================

/// Draining side of a completion loop.
pub struct CompletionLoop {
    receiver: Receiver<Callback>,
}

impl CompletionLoop {
    /// Run callbacks until every [`LoopContext`] clone is dropped.
    pub fn run(self) {
        for callback in self.receiver {
            callback();
        }
        debug!("Completion loop finished");
    }

    /// Run callbacks that are already queued, without waiting.
    ///
    /// Returns the number of callbacks run.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(callback) = self.receiver.try_recv() {
            callback();
            count += 1;
        }
        count
    }

    /// Run callbacks until `done` returns true or `timeout` elapses.
    ///
    /// Returns whether `done` was satisfied.
    pub fn run_until<F: FnMut() -> bool>(&self, timeout: Duration, mut done: F) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if done() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.receiver.recv_timeout(remaining) {
                Ok(callback) => callback(),
                Err(RecvTimeoutError::Timeout) => return done(),
                Err(RecvTimeoutError::Disconnected) => return done(),
            }
        }
    }

    /// Drain the loop on a dedicated named thread.
    pub fn spawn(self, name: impl Into<String>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.into()).spawn(move || self.run())
    }
}

// =============================================================================
// Tests
// =============================================================================
