//! Use-case façades.
//!
//! A [`UseCase`] only builds a unit of work from its parameters. An
//! [`Interactor`] runs that work through its own executor, so disposing one
//! façade cancels exactly the operations it started.

use std::sync::Arc;

use cueball_exec::{CompletionContext, Executor, Observer, OperationHandle, Work, WorkerPool};
use tracing::debug;

mod details;
mod matches;
mod turns;

pub use details::{FieldUpdate, UpdateMatchLocation, UpdateMatchNotes};
pub use matches::{AddMatch, DeleteMatch, GetMatch, GetMatchesList};
pub use turns::{AddTurn, TurnParams, UndoTurn};

/// Something the application can ask for.
pub trait UseCase: Send + Sync + 'static {
    /// Input of one invocation
    type Params: Send + 'static;
    /// Value(s) emitted by the work
    type Output: Send + 'static;

    /// Build the unit of work for `params`. Nothing runs until it is executed.
    fn build(&self, params: Self::Params) -> Work<Self::Output>;
}

/// Runs a use case off the caller's thread.
pub struct Interactor<U, P, C>
where
    U: UseCase,
    P: WorkerPool,
    C: CompletionContext,
{
    use_case: U,
    executor: Executor<P, C>,
}

impl<U, P, C> Interactor<U, P, C>
where
    U: UseCase,
    P: WorkerPool,
    C: CompletionContext,
{
    /// Create an interactor with its own cancellation group.
    pub fn new(use_case: U, pool: Arc<P>, context: Arc<C>) -> Self {
        Self {
            use_case,
            executor: Executor::new(pool, context),
        }
    }

    /// Build and schedule the work; results go to `observer` on the
    /// completion context.
    pub fn execute<O>(&self, params: U::Params, observer: O) -> OperationHandle
    where
        O: Observer<U::Output>,
    {
        self.executor.execute(self.use_case.build(params), observer)
    }

    /// Cancel everything this interactor started. Safe to call repeatedly.
    pub fn dispose(&self) {
        let cancelled = self.executor.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "Interactor disposed");
        }
    }

    /// Operations started and not yet finished
    pub fn active_count(&self) -> usize {
        self.executor.active_count()
    }

    /// The wrapped use case
    pub fn use_case(&self) -> &U {
        &self.use_case
    }
}
