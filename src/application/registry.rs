use super::deferred::CompletionHandle;
use super::normalizer::CanonicalResult;
use crate::domain::flow::FlowKind;
use crate::error::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Holds at most one pending completion handle per flow kind.
///
/// Only asynchronous flows are ever armed; card tokenization and wallet
/// availability checks complete in place.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    slots: Mutex<HashMap<FlowKind, CompletionHandle>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` for `kind`, last writer wins. The displaced handle, if
    /// any, is returned; dropping it abandons the caller waiting on it.
    pub async fn arm(&self, kind: FlowKind, handle: CompletionHandle) -> Option<CompletionHandle> {
        debug_assert!(kind.is_async(), "{kind} completes in place and has no slot");
        let mut slots = self.slots.lock().await;
        debug!(flow = %kind, "arming pending slot");
        slots.insert(kind, handle)
    }

    /// Stores `handle` only if the slot is vacant; otherwise hands it back.
    pub async fn try_arm(
        &self,
        kind: FlowKind,
        handle: CompletionHandle,
    ) -> std::result::Result<(), CompletionHandle> {
        debug_assert!(kind.is_async(), "{kind} completes in place and has no slot");
        let mut slots = self.slots.lock().await;
        if slots.contains_key(&kind) {
            return Err(handle);
        }
        debug!(flow = %kind, "arming pending slot");
        slots.insert(kind, handle);
        Ok(())
    }

    pub async fn is_armed(&self, kind: FlowKind) -> bool {
        self.slots.lock().await.contains_key(&kind)
    }

    /// Completes the handle armed for `kind` and clears the slot.
    ///
    /// Returns `false` when nothing was armed; the outcome is dropped.
    pub async fn complete_and_clear(
        &self,
        kind: FlowKind,
        outcome: Result<CanonicalResult>,
    ) -> bool {
        let Some(handle) = self.slots.lock().await.remove(&kind) else {
            debug!(flow = %kind, "no pending slot to complete, dropping outcome");
            return false;
        };
        if handle.send(outcome).is_err() {
            debug!(flow = %kind, "caller stopped waiting before completion");
        }
        true
    }
}
