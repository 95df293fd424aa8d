//! Result handlers.

use crate::error::ExecError;

/// Receives the events of one operation on the completion context.
///
/// `on_next` may be called any number of times, followed by at most one
/// of `on_complete` or `on_error`. Nothing is delivered after the
/// operation is cancelled. Every method has a no-op default so handlers
/// only implement what they care about.
pub trait Observer<T>: Send + 'static {
    /// A value produced by the work
    fn on_next(&mut self, _value: T) {}

    /// The work finished without error
    fn on_complete(&mut self) {}

    /// The work failed
    fn on_error(&mut self, _error: ExecError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultObserver;

impl<T> Observer<T> for DefaultObserver {}
