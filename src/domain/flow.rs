use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host request code tagging activity results that belong to a Venmo flow.
pub const VENMO_REQUEST_CODE: i32 = 13488;
/// Host request code tagging activity results that belong to a Google Pay flow.
pub const GOOGLE_PAY_REQUEST_CODE: i32 = 13593;
/// Host request code tagging payment-sheet results that belong to an Apple Pay flow.
pub const APPLE_PAY_REQUEST_CODE: i32 = 13621;

/// Identifies which payment method round-trip a call or pending slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    CardTokenize,
    VenmoAuthorize,
    GooglePayAvailability,
    GooglePayAuthorize,
    ApplePayAuthorize,
}

impl FlowKind {
    /// Flows that hand control to an external activity and complete through
    /// the correlator.
    pub const ASYNC: [FlowKind; 3] = [
        FlowKind::VenmoAuthorize,
        FlowKind::GooglePayAuthorize,
        FlowKind::ApplePayAuthorize,
    ];

    pub fn is_async(self) -> bool {
        Self::ASYNC.contains(&self)
    }

    pub fn request_code(self) -> Option<i32> {
        match self {
            FlowKind::VenmoAuthorize => Some(VENMO_REQUEST_CODE),
            FlowKind::GooglePayAuthorize => Some(GOOGLE_PAY_REQUEST_CODE),
            FlowKind::ApplePayAuthorize => Some(APPLE_PAY_REQUEST_CODE),
            FlowKind::CardTokenize | FlowKind::GooglePayAvailability => None,
        }
    }

    pub fn from_request_code(code: i32) -> Option<Self> {
        match code {
            VENMO_REQUEST_CODE => Some(FlowKind::VenmoAuthorize),
            GOOGLE_PAY_REQUEST_CODE => Some(FlowKind::GooglePayAuthorize),
            APPLE_PAY_REQUEST_CODE => Some(FlowKind::ApplePayAuthorize),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowKind::CardTokenize => "card tokenize",
            FlowKind::VenmoAuthorize => "Venmo",
            FlowKind::GooglePayAvailability => "Google Pay availability",
            FlowKind::GooglePayAuthorize => "Google Pay",
            FlowKind::ApplePayAuthorize => "Apple Pay",
        };
        f.write_str(name)
    }
}

/// Whether a Venmo account nonce may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethodUsage {
    SingleUse,
    MultiUse,
}

impl FromStr for PaymentMethodUsage {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singleUse" => Ok(PaymentMethodUsage::SingleUse),
            "multiUse" => Ok(PaymentMethodUsage::MultiUse),
            other => Err(BridgeError::InvalidArgument(format!(
                "unknown payment method usage '{other}', expected 'singleUse' or 'multiUse'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_external_activity_flows_are_async() {
        assert!(FlowKind::VenmoAuthorize.is_async());
        assert!(FlowKind::GooglePayAuthorize.is_async());
        assert!(FlowKind::ApplePayAuthorize.is_async());
        assert!(!FlowKind::CardTokenize.is_async());
        assert!(!FlowKind::GooglePayAvailability.is_async());
    }

    #[test]
    fn test_request_codes_map_back_to_their_flow() {
        for kind in FlowKind::ASYNC {
            let code = kind.request_code().unwrap();
            assert_eq!(FlowKind::from_request_code(code), Some(kind));
        }
        assert_eq!(FlowKind::from_request_code(42), None);
    }

    #[test]
    fn test_payment_method_usage_parsing() {
        assert_eq!(
            "multiUse".parse::<PaymentMethodUsage>().unwrap(),
            PaymentMethodUsage::MultiUse
        );
        assert_eq!(
            "singleUse".parse::<PaymentMethodUsage>().unwrap(),
            PaymentMethodUsage::SingleUse
        );
    }

    #[test]
    fn test_unknown_payment_method_usage_is_rejected() {
        let err = "MULTI_USE".parse::<PaymentMethodUsage>().unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert_eq!(err.tag(), "Error");
    }
}
