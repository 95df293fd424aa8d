//! Units of work.
//!
//! A unit of work is a stream of results. Each `Ok` item is delivered as
//! `on_next`; the first `Err` ends the operation with `on_error`; the end
//! of the stream ends it with `on_complete`.

use std::future::Future;

use futures_util::stream::{self, BoxStream, StreamExt};

use crate::error::ExecResult;

/// Boxed stream of results driven by the executor
pub type Work<T> = BoxStream<'static, ExecResult<T>>;

/// Work producing exactly one value (or one error).
pub fn single<T, F>(future: F) -> Work<T>
where
    T: Send + 'static,
    F: Future<Output = ExecResult<T>> + Send + 'static,
{
    stream::once(future).boxed()
}

/// Work that completes without emitting a value.
pub fn completion<F>(future: F) -> Work<()>
where
    F: Future<Output = ExecResult<()>> + Send + 'static,
{
    stream::once(future)
        .filter_map(|result| async move { result.err().map(Err) })
        .boxed()
}

/// Work emitting a fixed sequence of results.
pub fn from_results<T, I>(results: I) -> Work<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = ExecResult<T>>,
    I::IntoIter: Send + 'static,
{
    stream::iter(results).boxed()
}

// =============================================================================
// Tests
// =============================================================================
