//! Per-operation state and cancellation.
//!
//! # State machine
//!
//! ```text
//! Idle ──► Scheduled ──► Running ──► Completed
//!   │          │            ├──────► Failed
//!   └──────────┴────────────┴──────► Cancelled
//! ```
//!
//! Terminal states are final. The first transition into a terminal state
//! wins; this is what makes terminal delivery at-most-once.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::group::TaskGroup;

/// Operation identifier
pub type OperationId = Uuid;

/// Lifecycle state of a submitted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OperationState {
    /// Created, not yet submitted
    Idle = 0,
    /// Submitted to the worker pool
    Scheduled = 1,
    /// Work is being driven on a worker
    Running = 2,
    /// Completion delivered
    Completed = 3,
    /// Error delivered
    Failed = 4,
    /// Cancelled; nothing more is delivered
    Cancelled = 5,
}

impl OperationState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Scheduled,
            2 => Self::Running,
            3 => Self::Completed,
            4 => Self::Failed,
            _ => Self::Cancelled,
        }
    }

    /// No further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Operation
// =============================================================================

/// Shared state of one submitted unit of work.
///
/// Result handlers run inside the delivery gate. Cancelling passes through
/// the gate after flipping the state, so once `cancel` returns no handler
/// of this operation is running or will run. A handler that cancels its own
/// operation is detected and does not wait on itself.
pub(crate) struct Operation {
    id: OperationId,
    state: AtomicU8,
    token: CancellationToken,
    gate: Mutex<()>,
    delivering_on: Mutex<Option<ThreadId>>,
}

impl Operation {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            state: AtomicU8::new(OperationState::Idle as u8),
            token: CancellationToken::new(),
            gate: Mutex::new(()),
            delivering_on: Mutex::new(None),
        }
    }

    pub(crate) fn id(&self) -> OperationId {
        self.id
    }

    pub(crate) fn state(&self) -> OperationState {
        OperationState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Move `from -> to`; fails if the current state is not `from`.
    pub(crate) fn transition(&self, from: OperationState, to: OperationState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Enter `terminal` from any non-terminal state.
    ///
    /// Returns true only for the call that performed the transition.
    pub(crate) fn finish(&self, terminal: OperationState) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if OperationState::from_u8(current).is_terminal() {
                return false;
            }
            match self.state.compare_exchange_weak(
                current,
                terminal as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Cancel the operation and wait out any handler running on another thread.
    pub(crate) fn cancel(&self) -> bool {
        let cancelled = self.finish(OperationState::Cancelled);
        self.token.cancel();

        let reentrant = *lock(&self.delivering_on) == Some(thread::current().id());
        if !reentrant {
            drop(lock(&self.gate));
        }

        if cancelled {
            debug!(operation_id = %self.id, "Operation cancelled");
        }
        cancelled
    }

    /// Hold the delivery gate for the duration of one handler invocation.
    pub(crate) fn enter_delivery(&self) -> DeliveryGuard<'_> {
        let gate = lock(&self.gate);
        *lock(&self.delivering_on) = Some(thread::current().id());
        DeliveryGuard { op: self, _gate: gate }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the current thread as delivering until dropped.
pub(crate) struct DeliveryGuard<'a> {
    op: &'a Operation,
    _gate: MutexGuard<'a, ()>,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        *lock(&self.op.delivering_on) = None;
    }
}

// =============================================================================
// OperationHandle
// =============================================================================

/// Caller-side handle to a submitted operation.
#[derive(Clone)]
pub struct OperationHandle {
    op: Arc<Operation>,
    group: Weak<TaskGroup>,
}

impl OperationHandle {
    pub(crate) fn new(op: Arc<Operation>, group: Weak<TaskGroup>) -> Self {
        Self { op, group }
    }

    /// Operation id
    pub fn id(&self) -> OperationId {
        self.op.id()
    }

    /// Current state
    pub fn state(&self) -> OperationState {
        self.op.state()
    }

    /// Whether the operation reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.op.state().is_terminal()
    }

    /// Cancel this operation only.
    ///
    /// Returns false if it had already finished. Idempotent.
    pub fn cancel(&self) -> bool {
        let cancelled = self.op.cancel();
        if let Some(group) = self.group.upgrade() {
            group.remove(self.op.id());
        }
        cancelled
    }
}

impl fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("id", &self.op.id())
            .field("state", &self.op.state())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let op = Operation::new();
        assert_eq!(op.state(), OperationState::Idle);

        assert!(op.transition(OperationState::Idle, OperationState::Scheduled));
        assert!(!op.transition(OperationState::Idle, OperationState::Running));
        assert!(op.transition(OperationState::Scheduled, OperationState::Running));
        assert_eq!(op.state(), OperationState::Running);
    }

    #[test]
    fn test_only_first_terminal_wins() {
        let op = Operation::new();
        op.transition(OperationState::Idle, OperationState::Scheduled);

        assert!(op.finish(OperationState::Completed));
        assert!(!op.finish(OperationState::Failed));
        assert!(!op.cancel());
        assert_eq!(op.state(), OperationState::Completed);
    }

    #[test]
    fn test_cancel_is_idempotent_and_trips_token() {
        let op = Operation::new();

        assert!(op.cancel());
        assert!(!op.cancel());
        assert!(op.token().is_cancelled());
        assert_eq!(op.state(), OperationState::Cancelled);
    }

    #[test]
    fn test_cancel_inside_delivery_does_not_deadlock() {
        let op = Operation::new();

        let guard = op.enter_delivery();
        assert!(op.cancel());
        drop(guard);

        assert!(lock(&op.delivering_on).is_none());
    }
}
