use crate::domain::nonce::{CardNonce, PaymentMethodNonce, VenmoAccountNonce};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NONCE: &str = "nonce";
pub const CARD_NETWORK: &str = "cardNetwork";
pub const EXPIRATION_MONTH: &str = "expirationMonth";
pub const EXPIRATION_YEAR: &str = "expirationYear";
pub const CARDHOLDER_NAME: &str = "cardholderName";
pub const LAST_TWO: &str = "lastTwo";
pub const LAST_FOUR: &str = "lastFour";
pub const BIN: &str = "bin";
pub const VENMO_USERNAME: &str = "venmoUsername";

/// Flat field set handed back to the caller for a successful flow.
///
/// Values the gateway did not provide stay `None` and serialize as `null`;
/// they are never replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CanonicalResult(BTreeMap<String, Option<String>>);

impl CanonicalResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Option<String>>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// The field's value, or `None` when it is absent or null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_deref())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn card(nonce: CardNonce) -> CanonicalResult {
    CanonicalResult::new()
        .with(NONCE, nonce.nonce)
        .with(CARD_NETWORK, nonce.card_type)
        .with(EXPIRATION_MONTH, nonce.expiration_month)
        .with(EXPIRATION_YEAR, nonce.expiration_year)
        .with(CARDHOLDER_NAME, nonce.cardholder_name)
        .with(LAST_TWO, nonce.last_two)
        .with(LAST_FOUR, nonce.last_four)
        .with(BIN, nonce.bin)
}

pub fn venmo(account: VenmoAccountNonce) -> CanonicalResult {
    CanonicalResult::new()
        .with(NONCE, account.nonce)
        .with(VENMO_USERNAME, account.username)
}

pub fn payment_method(nonce: PaymentMethodNonce) -> CanonicalResult {
    CanonicalResult::new().with(NONCE, nonce.nonce)
}
