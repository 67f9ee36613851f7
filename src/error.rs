use crate::domain::flow::FlowKind;
use serde::Serialize;
use thiserror::Error;

/// Tag carried by every rejection outside a Venmo flow.
pub const ERROR_TAG: &str = "Error";
/// Tag carried by rejections of a started Venmo flow, including device-data
/// failures and bridge-side refusals.
pub const VENMO_ERROR_TAG: &str = "VenmoError";

/// Failure reported by a gateway adapter, carrying the SDK message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("{0}")]
    Gateway(GatewayError),
    #[error("{0}")]
    Venmo(GatewayError),
    #[error("Braintree client is not initialized.")]
    NotInitialized,
    #[error("A {0} flow is already in progress")]
    FlowInProgress(FlowKind),
    #[error("The pending {0} request was abandoned before it completed")]
    Abandoned(FlowKind),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid Apple Pay line items")]
    InvalidApplePayLineItems,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GatewayError> for BridgeError {
    fn from(err: GatewayError) -> Self {
        BridgeError::Gateway(err)
    }
}

impl BridgeError {
    /// Short tag the caller branches on. Refusals the bridge raises against a
    /// Venmo flow carry the Venmo tag too; a call made before setup does not.
    pub fn tag(&self) -> &'static str {
        match self {
            BridgeError::Venmo(_)
            | BridgeError::FlowInProgress(FlowKind::VenmoAuthorize)
            | BridgeError::Abandoned(FlowKind::VenmoAuthorize) => VENMO_ERROR_TAG,
            _ => ERROR_TAG,
        }
    }

    pub fn rejection(&self) -> Rejection {
        Rejection {
            code: self.tag(),
            message: self.to_string(),
        }
    }
}

/// What a rejected deferred result looks like from the caller's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub code: &'static str,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
