//! [`DerivationTask`]: the awaitable result of one submission.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::error;

use crate::crypto::CryptoKey;

/// A derivation started by [`KeyDeriver::handle_submit`](super::KeyDeriver::handle_submit).
///
/// Resolves to `Some(key)` on success and `None` once a failure has been
/// logged. Dropping the task detaches it: the derivation keeps running to
/// completion, there is no way to cancel it.
#[derive(Debug)]
#[must_use = "dropping a DerivationTask discards the derived key"]
pub struct DerivationTask {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Running(JoinHandle<Option<CryptoKey>>),
    Settled,
}

impl DerivationTask {
    pub(crate) fn spawn<F>(derivation: F) -> Self
    where
        F: Future<Output = Option<CryptoKey>> + Send + 'static,
    {
        Self {
            inner: Inner::Running(tokio::spawn(derivation)),
        }
    }

    /// A task that has already failed and resolves to `None`.
    pub(crate) fn settled() -> Self {
        Self {
            inner: Inner::Settled,
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Inner::Running(handle) => handle.is_finished(),
            Inner::Settled => true,
        }
    }
}

impl Future for DerivationTask {
    type Output = Option<CryptoKey>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.inner {
            Inner::Settled => Poll::Ready(None),
            Inner::Running(handle) => match Pin::new(handle).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(key)) => Poll::Ready(key),
                Poll::Ready(Err(e)) => {
                    // A panicking provider lands here instead of unwinding into the caller.
                    error!(error = %e, "derivation task did not complete");
                    Poll::Ready(None)
                }
            },
        }
    }
}
