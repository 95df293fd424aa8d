//! Executor: runs work on a worker pool, delivers on a completion context.
//!
//! # Flow
//!
//! ```text
//! execute(work, observer)
//!     │  Idle → Scheduled, register in TaskGroup
//!     ▼
//! WorkerPool::submit(job)                  (caller returns immediately)
//!     │  Scheduled → Running
//!     ▼
//! drive work stream ── select! ── cancellation token
//!     │ each event
//!     ▼
//! CompletionContext::run_on(callback)
//!     │  state checked under the delivery gate
//!     ▼
//! observer.on_next / on_complete / on_error
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures_util::{FutureExt, StreamExt};
use tracing::{debug, error, warn};

use crate::completion::CompletionContext;
use crate::error::{ExecError, FailureKind};
use crate::group::TaskGroup;
use crate::observer::Observer;
use crate::operation::{Operation, OperationHandle, OperationState};
use crate::pool::WorkerPool;
use crate::work::Work;

// =============================================================================
// Executor
// =============================================================================

/// Runs units of work off the caller's thread.
///
/// Generic over:
/// - `P`: WorkerPool implementation (where work runs)
/// - `C`: CompletionContext implementation (where handlers run)
pub struct Executor<P: WorkerPool, C: CompletionContext> {
    pool: Arc<P>,
    context: Arc<C>,
    group: Arc<TaskGroup>,
}

impl<P: WorkerPool, C: CompletionContext> Clone for Executor<P, C> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            context: Arc::clone(&self.context),
            group: Arc::clone(&self.group),
        }
    }
}

impl<P: WorkerPool, C: CompletionContext> Executor<P, C> {
    /// Create an executor with its own task group.
    pub fn new(pool: Arc<P>, context: Arc<C>) -> Self {
        Self {
            pool,
            context,
            group: Arc::new(TaskGroup::new()),
        }
    }

    /// Schedule `work` and route its events to `observer`.
    ///
    /// Never blocks. The returned handle can cancel this operation alone;
    /// [`Executor::cancel_all`] cancels it together with every other live
    /// operation of this executor.
    ///
    /// If the pool rejects the job, the rejection is delivered to
    /// `observer.on_error` on the completion context.
    pub fn execute<T, O>(&self, work: Work<T>, observer: O) -> OperationHandle
    where
        T: Send + 'static,
        O: Observer<T>,
    {
        let op = Arc::new(Operation::new());
        let handle = OperationHandle::new(Arc::clone(&op), Arc::downgrade(&self.group));

        self.group.insert(Arc::clone(&op));
        op.transition(OperationState::Idle, OperationState::Scheduled);

        let delivery = Arc::new(Delivery {
            op: Arc::clone(&op),
            observer: Mutex::new(observer),
            context: Arc::clone(&self.context),
            group: Arc::downgrade(&self.group),
        });

        debug!(operation_id = %op.id(), "Operation scheduled");

        if let Err(err) = self.pool.submit(Box::pin(drive(work, Arc::clone(&delivery)))) {
            warn!(operation_id = %op.id(), error = %err, "Worker pool rejected operation");
            delivery.post::<T>(Event::Error(err));
        }

        handle
    }

    /// Cancel every live operation. Idempotent; leaves the group empty.
    ///
    /// Returns the number of operations this call cancelled.
    pub fn cancel_all(&self) -> usize {
        self.group.cancel_all()
    }

    /// Number of operations not yet finished
    pub fn active_count(&self) -> usize {
        self.group.len()
    }

    /// Worker pool
    pub fn pool(&self) -> &Arc<P> {
        &self.pool
    }

    /// Completion context
    pub fn context(&self) -> &Arc<C> {
        &self.context
    }
}

// =============================================================================
// Delivery
// =============================================================================

enum Event<T> {
    Next(T),
    Complete,
    Error(ExecError),
}

struct Delivery<O, C> {
    op: Arc<Operation>,
    observer: Mutex<O>,
    context: Arc<C>,
    group: Weak<TaskGroup>,
}

impl<O, C: CompletionContext> Delivery<O, C> {
    /// Hand an event to the completion context.
    fn post<T>(self: &Arc<Self>, event: Event<T>)
    where
        T: Send + 'static,
        O: Observer<T>,
    {
        let this = Arc::clone(self);
        if let Err(err) = self.context.run_on(Box::new(move || this.deliver(event))) {
            // Nothing can be delivered any more; retire the operation
            if self.op.cancel() {
                warn!(operation_id = %self.op.id(), error = %err, "Completion context gone, operation cancelled");
            }
            self.detach();
        }
    }

    fn deliver<T>(&self, event: Event<T>)
    where
        O: Observer<T>,
    {
        let _gate = self.op.enter_delivery();
        let mut observer = self.observer.lock().unwrap_or_else(PoisonError::into_inner);

        match event {
            Event::Next(value) => {
                if self.op.state() == OperationState::Running {
                    observer.on_next(value);
                } else {
                    debug!(operation_id = %self.op.id(), state = %self.op.state(), "Dropped value");
                }
            },
            Event::Complete => {
                if self.op.finish(OperationState::Completed) {
                    self.detach();
                    observer.on_complete();
                }
            },
            Event::Error(err) => {
                if self.op.finish(OperationState::Failed) {
                    self.detach();
                    error!(operation_id = %self.op.id(), error = %err, "Operation failed");
                    observer.on_error(err);
                }
            },
        }
    }

    fn detach(&self) {
        if let Some(group) = self.group.upgrade() {
            group.remove(self.op.id());
        }
    }
}

/// Worker-side loop: pull from the work stream until it ends, fails,
/// panics or the operation is cancelled.
async fn drive<T, O, C>(mut work: Work<T>, delivery: Arc<Delivery<O, C>>)
where
    T: Send + 'static,
    O: Observer<T>,
    C: CompletionContext,
{
    let op = Arc::clone(&delivery.op);
    if !op.transition(OperationState::Scheduled, OperationState::Running) {
        debug!(operation_id = %op.id(), state = %op.state(), "Operation not started");
        return;
    }

    let token = op.token().clone();
    loop {
        let next = tokio::select! {
            biased;

            _ = token.cancelled() => {
                debug!(operation_id = %op.id(), "Work stopped by cancellation");
                return;
            }
            next = AssertUnwindSafe(work.next()).catch_unwind() => next,
        };

        match next {
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(operation_id = %op.id(), reason = %reason, "Work panicked");
                delivery.post::<T>(Event::Error(ExecError::upstream(
                    FailureKind::Other,
                    format!("work panicked: {}", reason),
                )));
                return;
            },
            Ok(Some(Ok(value))) => delivery.post(Event::Next(value)),
            Ok(Some(Err(err))) => {
                delivery.post(Event::Error(err));
                return;
            },
            Ok(None) => {
                delivery.post::<T>(Event::Complete);
                return;
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{completion_loop, CompletionLoop, LoopContext};
    use crate::error::ExecResult;
    use crate::stub::{QueuedPool, Recorded, RecordingObserver};
    use crate::work::{completion, from_results, single};

    fn setup() -> (Executor<QueuedPool, LoopContext>, CompletionLoop) {
        let (context, main_loop) = completion_loop();
        let executor = Executor::new(Arc::new(QueuedPool::new()), Arc::new(context));
        (executor, main_loop)
    }

    #[test]
    fn test_execute_does_not_run_inline() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        let handle = executor.execute(single(async { Ok(5) }), observer.clone());

        assert_eq!(handle.state(), OperationState::Scheduled);
        assert_eq!(executor.pool().pending(), 1);
        assert_eq!(main_loop.run_pending(), 0);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_values_then_completion() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        let handle = executor.execute(from_results(vec![Ok(1), Ok(2), Ok(3)]), observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert_eq!(observer.values(), vec![1, 2, 3]);
        assert_eq!(observer.completions(), 1);
        assert_eq!(observer.errors(), 0);
        assert_eq!(handle.state(), OperationState::Completed);
        assert_eq!(executor.active_count(), 0);
    }

    #[test]
    fn test_error_is_terminal() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();
        let work = from_results(vec![
            Ok(1),
            Err(ExecError::upstream(FailureKind::NotFound, "missing")),
            Ok(2),
        ]);

        let handle = executor.execute(work, observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert_eq!(observer.values(), vec![1]);
        assert_eq!(observer.errors(), 1);
        assert_eq!(observer.completions(), 0);
        assert_eq!(handle.state(), OperationState::Failed);
    }

    #[test]
    fn test_completion_work_emits_no_value() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::<()>::new();

        executor.execute(completion(async { Ok(()) }), observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert!(observer.values().is_empty());
        assert_eq!(observer.completions(), 1);
    }

    #[test]
    fn test_cancel_before_dequeue_delivers_nothing() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        let handle = executor.execute(single(async { Ok(1) }), observer.clone());
        assert!(handle.cancel());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert!(observer.events().is_empty());
        assert_eq!(handle.state(), OperationState::Cancelled);
        assert_eq!(executor.active_count(), 0);
    }

    #[test]
    fn test_cancel_all_before_either_completes() {
        let (executor, main_loop) = setup();
        let first = RecordingObserver::new();
        let second = RecordingObserver::new();

        executor.execute(single(async { Ok(1) }), first.clone());
        executor.execute(single(async { Ok(2) }), second.clone());
        assert_eq!(executor.cancel_all(), 2);
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert!(first.events().is_empty());
        assert!(second.events().is_empty());
    }

    #[test]
    fn test_cancel_suppresses_results_in_flight() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        executor.execute(single(async { Ok(1) }), observer.clone());
        // Work finishes and its events are queued on the completion context
        executor.pool().run_queued().unwrap();
        executor.cancel_all();
        let ran = main_loop.run_pending();

        assert_eq!(ran, 2);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_cancel_all_twice_leaves_group_empty() {
        let (executor, _main_loop) = setup();
        executor.execute(single(async { Ok(1) }), RecordingObserver::new());

        assert_eq!(executor.cancel_all(), 1);
        assert_eq!(executor.cancel_all(), 0);
        assert_eq!(executor.active_count(), 0);
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        let handle = executor.execute(single(async { Ok(1) }), observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert!(!handle.cancel());
        assert_eq!(handle.state(), OperationState::Completed);
        assert_eq!(observer.completions(), 1);
    }

    #[test]
    fn test_rejected_submission_reaches_observer() {
        let (executor, main_loop) = setup();
        executor.pool().set_reject(true);
        let observer = RecordingObserver::<i32>::new();

        let handle = executor.execute(single(async { Ok(1) }), observer.clone());
        main_loop.run_pending();

        assert_eq!(observer.errors(), 1);
        assert_eq!(handle.state(), OperationState::Failed);
        assert_eq!(executor.active_count(), 0);
    }

    #[test]
    fn test_executor_reusable_after_cancel_all() {
        let (executor, main_loop) = setup();
        executor.execute(single(async { Ok(1) }), RecordingObserver::new());
        executor.cancel_all();

        let observer = RecordingObserver::new();
        executor.execute(single(async { Ok(9) }), observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        assert_eq!(observer.values(), vec![9]);
    }

    fn explode() -> ExecResult<i32> {
        panic!("boom")
    }

    #[test]
    fn test_panicking_work_fails_once() {
        let (executor, main_loop) = setup();
        let observer = RecordingObserver::new();

        let handle = executor.execute(single(async { explode() }), observer.clone());
        executor.pool().run_queued().unwrap();
        main_loop.run_pending();

        let events = observer.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Recorded::Error(FailureKind::Other, message) if message.contains("boom")
        ));
        assert_eq!(handle.state(), OperationState::Failed);
        assert_eq!(executor.active_count(), 0);
    }

    #[test]
    fn test_lost_completion_context_retires_operation() {
        let (executor, main_loop) = setup();
        drop(main_loop);
        let observer = RecordingObserver::new();

        let handle = executor.execute(single(async { Ok(1) }), observer.clone());
        executor.pool().run_queued().unwrap();

        assert_eq!(handle.state(), OperationState::Cancelled);
        assert_eq!(executor.active_count(), 0);
        assert!(observer.events().is_empty());
    }
}
