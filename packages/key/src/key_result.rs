//! Concrete async result type for key work

use crate::{KeyError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Pending result of key generation or import
///
/// The CPU-bound body runs on tokio's blocking pool and reports back over a
/// oneshot channel.
pub struct AsyncKeyResult<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

/// Key result with user-defined result handler
pub struct AsyncKeyResultWithHandler<T, F> {
    receiver: oneshot::Receiver<Result<T>>,
    handler: Option<F>,
}

impl<T: Send + 'static> AsyncKeyResult<T> {
    /// Run `work` on the blocking pool
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_blocking<W>(work: W) -> Self
    where
        W: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(work());
        });
        Self { receiver: rx }
    }

    /// Create a result that's already completed
    #[must_use]
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Create a result that yields an error
    #[must_use]
    pub fn error(error: KeyError) -> Self {
        Self::ready(Err(error))
    }

    /// Resolve through `handler` instead of returning the `Result`
    pub fn on_result<F, U>(self, handler: F) -> AsyncKeyResultWithHandler<T, F>
    where
        F: FnOnce(Result<T>) -> U,
    {
        AsyncKeyResultWithHandler {
            receiver: self.receiver,
            handler: Some(handler),
        }
    }
}

impl<T> Future for AsyncKeyResult<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(KeyError::TaskFailed(
                "key task dropped before completing".to_string(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, F, U> Future for AsyncKeyResultWithHandler<T, F>
where
    F: FnOnce(Result<T>) -> U + Unpin,
{
    type Output = U;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        // Handler already consumed: the receiver must not be polled again
        if this.handler.is_none() {
            return Poll::Pending;
        }

        let result = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => Err(KeyError::TaskFailed(
                "key task dropped before completing".to_string(),
            )),
            Poll::Pending => return Poll::Pending,
        };

        match this.handler.take() {
            Some(handler) => Poll::Ready(handler(result)),
            None => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawned_work_resolves() {
        let value = AsyncKeyResult::spawn_blocking(|| Ok(21 * 2)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let err = AsyncKeyResult::<()>::error(KeyError::MissingAlgorithm).await.unwrap_err();
        assert_eq!(err, KeyError::MissingAlgorithm);
    }

    #[tokio::test]
    async fn test_panicking_worker_reports_task_failure() {
        let result = AsyncKeyResult::<u8>::spawn_blocking(|| panic!("worker blew up")).await;
        assert!(matches!(result, Err(KeyError::TaskFailed(_))));
    }

    #[tokio::test]
    async fn test_on_result_handler_unwraps() {
        let len = AsyncKeyResult::ready(Ok(vec![1u8, 2, 3]))
            .on_result(|result| result.map(|v| v.len()).unwrap_or_default())
            .await;
        assert_eq!(len, 3);
    }
}
