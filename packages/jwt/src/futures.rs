//! Concrete Future type for JWT operations.
//!
//! Operations run their RSA work on tokio's blocking pool and hand the
//! result back over a oneshot channel.

use crate::error::{JwtError, Operation, OperationError};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Future for a sign, verify, encrypt or decrypt operation.
pub struct AsyncJwtResult<T> {
    operation: Operation,
    rx: oneshot::Receiver<Result<T, OperationError>>,
}

impl<T: Send + 'static> AsyncJwtResult<T> {
    /// Run `work` on the blocking pool, attributing failures to `operation`.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn_blocking<W>(operation: Operation, work: W) -> Self
    where
        W: FnOnce() -> Result<T, JwtError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(work().map_err(|e| OperationError::new(operation, e)));
        });
        Self { operation, rx }
    }

    /// Create a future that's already failed.
    #[must_use]
    pub fn error(operation: Operation, error: JwtError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(OperationError::new(operation, error)));
        Self { operation, rx }
    }

    /// Operation this future resolves.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl<T> Future for AsyncJwtResult<T> {
    type Output = Result<T, OperationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let operation = self.operation;
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(OperationError::new(operation, JwtError::TaskFailed))),
            Poll::Pending => Poll::Pending,
        }
    }
}
