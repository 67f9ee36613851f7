use serde::Deserialize;

/// Tokenized card as returned by the card gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardNonce {
    pub nonce: String,
    pub card_type: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cardholder_name: Option<String>,
    pub last_two: String,
    pub last_four: String,
    pub bin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VenmoAccountNonce {
    pub nonce: String,
    pub username: String,
}

/// Nonce produced by a wallet sheet such as Google Pay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethodNonce {
    pub nonce: String,
}
