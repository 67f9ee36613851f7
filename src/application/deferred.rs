use super::normalizer::CanonicalResult;
use crate::domain::flow::FlowKind;
use crate::error::{BridgeError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Completes a deferred result. Sending consumes it, so a handle completes at
/// most once.
pub type CompletionHandle = oneshot::Sender<Result<CanonicalResult>>;

/// The caller's side of an asynchronous flow.
///
/// Resolves once the correlator completes the matching slot. If the handle is
/// dropped without completing (overwritten, or its session replaced) the
/// result is `BridgeError::Abandoned`.
#[derive(Debug)]
pub struct Deferred {
    kind: FlowKind,
    receiver: oneshot::Receiver<Result<CanonicalResult>>,
}

impl Deferred {
    pub fn channel(kind: FlowKind) -> (CompletionHandle, Deferred) {
        let (sender, receiver) = oneshot::channel();
        (sender, Deferred { kind, receiver })
    }

    /// A deferred result that is already rejected.
    pub fn rejected(kind: FlowKind, err: BridgeError) -> Deferred {
        let (handle, deferred) = Self::channel(kind);
        // The receiver is alive in `deferred`, so the send cannot fail.
        let _ = handle.send(Err(err));
        deferred
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    /// Takes the outcome if the flow has settled, without waiting.
    pub fn try_take(&mut self) -> Option<Result<CanonicalResult>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(BridgeError::Abandoned(self.kind))),
        }
    }
}

impl Future for Deferred {
    type Output = Result<CanonicalResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let kind = self.kind;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BridgeError::Abandoned(kind))))
    }
}
