//! Stub implementations for testing.
//!
//! [`QueuedPool`] holds submitted jobs until the test decides to run them,
//! which makes the window between submission and execution observable.
//! [`RecordingObserver`] captures every event it receives.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Builder;

use crate::error::{ExecError, ExecResult, FailureKind};
use crate::observer::Observer;
use crate::pool::{Job, WorkerPool};

// =============================================================================
// Queued Pool
// =============================================================================

/// Worker pool that queues jobs and runs them on demand.
#[derive(Default)]
pub struct QueuedPool {
    queue: Mutex<VecDeque<Job>>,
    reject: AtomicBool,
}

impl QueuedPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs submitted but not yet run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Configure the pool to reject every submission.
    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Run queued jobs to completion, in submission order, on the calling
    /// thread. Jobs submitted while running are run as well.
    ///
    /// Returns the number of jobs run.
    pub fn run_queued(&self) -> io::Result<usize> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let mut count = 0;
        loop {
            let job = self.queue.lock().unwrap().pop_front();
            match job {
                Some(job) => {
                    runtime.block_on(job);
                    count += 1;
                },
                None => return Ok(count),
            }
        }
    }
}

impl WorkerPool for QueuedPool {
    fn submit(&self, job: Job) -> ExecResult<()> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ExecError::Rejected("stub pool rejects all jobs".to_string()));
        }
        self.queue.lock().unwrap().push_back(job);
        Ok(())
    }
}

// =============================================================================
// Recording Observer
// =============================================================================

/// An event seen by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded<T> {
    /// `on_next`
    Next(T),
    /// `on_complete`
    Complete,
    /// `on_error`, with the failure kind and message
    Error(FailureKind, String),
}

/// Observer that records events. Clones share the same record.
pub struct RecordingObserver<T> {
    events: Arc<Mutex<Vec<Recorded<T>>>>,
}

impl<T> RecordingObserver<T> {
    /// Create an observer with an empty record.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of `on_complete` calls
    pub fn completions(&self) -> usize {
        self.count(|e| matches!(e, Recorded::Complete))
    }

    /// Number of `on_error` calls
    pub fn errors(&self) -> usize {
        self.count(|e| matches!(e, Recorded::Error(..)))
    }

    fn count(&self, pred: impl Fn(&Recorded<T>) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl<T: Clone> RecordingObserver<T> {
    /// Every event, in delivery order
    pub fn events(&self) -> Vec<Recorded<T>> {
        self.events.lock().unwrap().clone()
    }

    /// Values passed to `on_next`, in delivery order
    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Recorded::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingObserver<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T: Send + 'static> Observer<T> for RecordingObserver<T> {
    fn on_next(&mut self, value: T) {
        self.events.lock().unwrap().push(Recorded::Next(value));
    }

    fn on_complete(&mut self) {
        self.events.lock().unwrap().push(Recorded::Complete);
    }

    fn on_error(&mut self, error: ExecError) {
        self.events
            .lock()
            .unwrap()
            .push(Recorded::Error(error.kind(), error.to_string()));
    }
}

// =============================================================================
// Tests
// =============================================================================
