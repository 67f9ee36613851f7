use super::flow::PaymentMethodUsage;
use crate::error::BridgeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw card details handed to the card gateway. Only the security code is
/// optional; the rest are passed through without format checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenmoRequest {
    pub payment_method_usage: PaymentMethodUsage,
    pub should_vault: bool,
}

impl VenmoRequest {
    pub fn new(payment_method_usage: PaymentMethodUsage) -> Self {
        Self {
            payment_method_usage,
            should_vault: false,
        }
    }

    pub fn with_vault(mut self, should_vault: bool) -> Self {
        self.should_vault = should_vault;
        self
    }
}

/// A non-negative amount with at most two significant decimal places,
/// always rendered with exactly two.
///
/// Amounts are never rounded: `"0.125"` is rejected rather than charged as
/// `"0.13"`. Thousands separators are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, BridgeError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(BridgeError::InvalidArgument(format!(
                "price must not be negative, got {value}"
            )));
        }
        // "10.000" is still a whole number of cents.
        if value.normalize().scale() > 2 {
            return Err(BridgeError::InvalidArgument(format!(
                "price must not have more than two decimal places, got {value}"
            )));
        }
        Ok(Self(value))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = BridgeError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Price {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| BridgeError::InvalidArgument(format!("invalid price '{s}': {e}")))?;
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalPriceStatus {
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub total_price: Price,
    pub total_price_status: TotalPriceStatus,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayRequest {
    pub transaction_info: TransactionInfo,
    pub billing_address_required: bool,
}

impl GooglePayRequest {
    pub fn new(total_price: Price, currency_code: impl Into<String>) -> Self {
        Self {
            transaction_info: TransactionInfo {
                total_price,
                total_price_status: TotalPriceStatus::Final,
                currency_code: currency_code.into(),
            },
            billing_address_required: false,
        }
    }

    pub fn with_billing_address_required(mut self, required: bool) -> Self {
        self.billing_address_required = required;
        self
    }
}

/// Card networks offered on the Apple Pay sheet when the caller names none.
pub const DEFAULT_SUPPORTED_NETWORKS: [&str; 3] = ["AmEx", "Visa", "MasterCard"];

pub fn default_supported_networks() -> Vec<String> {
    DEFAULT_SUPPORTED_NETWORKS
        .iter()
        .map(|network| network.to_string())
        .collect()
}

/// One row of the Apple Pay payment summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplePayLineItem {
    pub label: String,
    pub amount: Price,
}

#[derive(Deserialize)]
struct RawLineItem {
    label: String,
    amount: String,
}

impl ApplePayLineItem {
    pub fn new(label: impl Into<String>, amount: Price) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }

    /// Reads line items from a JSON array of `{"label", "amount"}` objects
    /// whose amounts are decimal strings.
    ///
    /// Any malformed item, unreadable amount, or an empty list rejects the
    /// whole set with [`BridgeError::InvalidApplePayLineItems`].
    pub fn parse_all(json: &str) -> Result<Vec<Self>, BridgeError> {
        let raw: Vec<RawLineItem> =
            serde_json::from_str(json).map_err(|_| BridgeError::InvalidApplePayLineItems)?;
        if raw.is_empty() {
            return Err(BridgeError::InvalidApplePayLineItems);
        }
        raw.into_iter()
            .map(|item| {
                let amount = item
                    .amount
                    .parse::<Price>()
                    .map_err(|_| BridgeError::InvalidApplePayLineItems)?;
                Ok(Self::new(item.label, amount))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayRequest {
    pub merchant_identifier: String,
    pub payment_summary_items: Vec<ApplePayLineItem>,
    pub required_billing_contact_fields: Option<Vec<String>>,
    pub supported_networks: Vec<String>,
    pub currency_code: String,
}

impl ApplePayRequest {
    pub fn new(
        merchant_identifier: impl Into<String>,
        payment_summary_items: Vec<ApplePayLineItem>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            merchant_identifier: merchant_identifier.into(),
            payment_summary_items,
            required_billing_contact_fields: None,
            supported_networks: default_supported_networks(),
            currency_code: currency_code.into(),
        }
    }

    pub fn with_billing_contact_fields(mut self, fields: Option<Vec<String>>) -> Self {
        self.required_billing_contact_fields = fields;
        self
    }

    pub fn with_supported_networks(mut self, networks: Option<Vec<String>>) -> Self {
        if let Some(networks) = networks {
            self.supported_networks = networks;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_renders_two_decimals() {
        assert_eq!("10".parse::<Price>().unwrap().to_string(), "10.00");
        assert_eq!("5.5".parse::<Price>().unwrap().to_string(), "5.50");
        assert_eq!("10.000".parse::<Price>().unwrap().to_string(), "10.00");
        assert_eq!(Price::new(dec!(0)).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_price_is_never_rounded() {
        let err = "0.125".parse::<Price>().unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: price must not have more than two decimal places, got 0.125"
        );
        assert!(Price::try_from(dec!(19.999)).is_err());
    }

    #[test]
    fn test_price_rejects_garbage_and_negatives() {
        assert!(matches!(
            "ten dollars".parse::<Price>(),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            Price::try_from(dec!(-1.00)),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(matches!(
            "1,000.00".parse::<Price>(),
            Err(BridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_google_pay_request_serializes_final_price() {
        let request = GooglePayRequest::new("10.00".parse().unwrap(), "USD")
            .with_billing_address_required(true);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["transactionInfo"]["totalPrice"], "10.00");
        assert_eq!(json["transactionInfo"]["totalPriceStatus"], "FINAL");
        assert_eq!(json["transactionInfo"]["currencyCode"], "USD");
        assert_eq!(json["billingAddressRequired"], true);
    }

    #[test]
    fn test_apple_pay_line_items_parse() {
        let items = ApplePayLineItem::parse_all(
            r#"[{"label": "Coffee", "amount": "4.5"}, {"label": "Total", "amount": "4.50"}]"#,
        )
        .unwrap();

        assert_eq!(
            items,
            vec![
                ApplePayLineItem::new("Coffee", Price::new(dec!(4.5)).unwrap()),
                ApplePayLineItem::new("Total", Price::new(dec!(4.50)).unwrap()),
            ]
        );
        assert_eq!(items[0].amount.to_string(), "4.50");
    }

    #[test]
    fn test_invalid_apple_pay_line_items_are_rejected() {
        for json in [
            "[]",
            "not json",
            r#"[{"label": "Total"}]"#,
            r#"[{"label": "Total", "amount": 4.5}]"#,
            r#"[{"label": "Total", "amount": "four"}]"#,
            r#"[{"label": "Total", "amount": "0.125"}]"#,
            r#"[{"label": "Refund", "amount": "-1.00"}]"#,
        ] {
            let err = ApplePayLineItem::parse_all(json).unwrap_err();
            assert_eq!(err.to_string(), "Invalid Apple Pay line items", "{json}");
        }
    }

    #[test]
    fn test_apple_pay_request_defaults_networks() {
        let items = vec![ApplePayLineItem::new("Total", "10".parse().unwrap())];
        let request = ApplePayRequest::new("merchant.com.example", items, "USD")
            .with_supported_networks(None)
            .with_billing_contact_fields(Some(vec!["postalAddress".to_string()]));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["supportedNetworks"],
            serde_json::json!(["AmEx", "Visa", "MasterCard"])
        );
        assert_eq!(json["paymentSummaryItems"][0]["amount"], "10.00");
        assert_eq!(json["requiredBillingContactFields"][0], "postalAddress");
        assert_eq!(json["merchantIdentifier"], "merchant.com.example");
    }
}
