use super::flow::FlowKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result code the host reports when the external activity finished normally.
pub const RESULT_OK: i32 = -1;
/// Result code the host reports when the user backed out of the external activity.
pub const RESULT_CANCELED: i32 = 0;

/// Delivered by the host when an external activity hands control back.
///
/// `request_code` is the flow tag the activity was launched with, so the
/// event names the slot it belongs to. `payload` is opaque to the bridge
/// and only the matching gateway interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub request_code: i32,
    pub result_code: i32,
    #[serde(default)]
    pub payload: Value,
}

impl ActivityResult {
    pub fn new(request_code: i32, result_code: i32, payload: Value) -> Self {
        Self {
            request_code,
            result_code,
            payload,
        }
    }

    /// Builds an event tagged for `kind`. Synchronous flows have no request
    /// code and yield an event no slot will claim.
    pub fn for_flow(kind: FlowKind, result_code: i32, payload: Value) -> Self {
        Self::new(kind.request_code().unwrap_or(-1), result_code, payload)
    }

    pub fn flow_kind(&self) -> Option<FlowKind> {
        FlowKind::from_request_code(self.request_code)
    }

    pub fn is_canceled(&self) -> bool {
        self.result_code == RESULT_CANCELED
    }
}
