//! Bounded concurrency executor.
//!
//! Runs task factories with at most `limit` futures in flight. A factory is
//! only invoked once a slot is free, so tasks beyond the limit are not
//! started early. Results arrive in completion order, not submission order.

use std::future::Future;

use futures::stream::{self, StreamExt, TryStreamExt};

/// Run fallible tasks with at most `limit` in flight.
///
/// Returns every result once all tasks have succeeded. The first error is
/// returned to the caller as soon as it settles. Started tasks run as
/// their own tokio tasks, so siblings already in flight keep running to
/// completion; factories not yet invoked are never started. A `limit` of
/// zero is treated as one.
pub async fn bounded_execute<I, F, Fut, T, E>(tasks: I, limit: usize) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    stream::iter(tasks)
        .map(|task| tokio::spawn(task()))
        .buffer_unordered(limit.max(1))
        .map(|joined| match joined {
            Ok(result) => result,
            // Handles are never aborted, so a join error carries a panic
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        })
        .try_collect()
        .await
}

/// Run infallible tasks with at most `limit` in flight
pub async fn bounded_collect<I, F, Fut, T>(tasks: I, limit: usize) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(tasks)
        .map(|task| task())
        .buffer_unordered(limit.max(1))
        .collect()
        .await
}
