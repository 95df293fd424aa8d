//! Group cancellation registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::operation::{Operation, OperationId};

/// The set of live operations submitted through one executor.
///
/// Operations register on submission and remove themselves once they
/// reach a terminal state. `cancel_all` drains the registry, so the group
/// can keep accepting operations afterwards.
#[derive(Default)]
pub struct TaskGroup {
    operations: Mutex<HashMap<OperationId, Arc<Operation>>>,
}

impl TaskGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, op: Arc<Operation>) {
        self.lock().insert(op.id(), op);
    }

    pub(crate) fn remove(&self, id: OperationId) {
        self.lock().remove(&id);
    }

    /// Cancel every live operation and empty the registry.
    ///
    /// Returns how many operations this call cancelled. Calling it again
    /// is harmless and returns 0.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Arc<Operation>> = self.lock().drain().map(|(_, op)| op).collect();
        // Cancel outside the lock; cancel may wait for a running handler
        let cancelled = drained.iter().filter(|op| op.cancel()).count();
        if !drained.is_empty() {
            debug!(drained = drained.len(), cancelled, "Task group cancelled");
        }
        cancelled
    }

    /// Number of live operations
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// No live operations
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OperationId, Arc<Operation>>> {
        self.operations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Tests
// =============================================================================
